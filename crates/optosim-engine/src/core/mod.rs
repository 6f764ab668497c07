//! Contracts between the runtime loop and the hosting application.
//!
//! The runtime owns the window and GPU; the application sees them only
//! through [`FrameCtx`] once per redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
