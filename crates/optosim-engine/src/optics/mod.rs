//! Optical simulation model.
//!
//! CPU side of the lens post-process:
//! - per-eye prescription state owned by the host (`lens`)
//! - tunable constants of the warp + blur approximation (`model`)
//! - a reference implementation of the per-pixel kernel (`kernel`)
//!
//! This is a perceptual approximation, not a ray-traced lens model.

mod kernel;
mod lens;
mod model;

#[cfg(test)]
mod test_image;

pub use kernel::{shade, taps, ImageSampler, Tap, TAP_COUNT};
pub use lens::{normalize_axis, Eye, LensProfile, OpticalSimulationConfig};
pub use model::{OpticalModel, TapWeights};
