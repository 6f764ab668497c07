//! Frame timing.
//!
//! One [`FrameClock`] per window, ticked once per redraw. [`FpsMeter`]
//! turns the ticks into a periodic frame-rate sample for logging.

mod fps;
mod frame_clock;

pub use fps::FpsMeter;
pub use frame_clock::{FrameClock, FrameTime};
