//! Two-pass lens simulation pipeline.
//!
//! - `target`: intermediate frame buffer sizing and ownership
//! - `capture`: first pass, scene into the intermediate target
//! - `post`: second pass, the optical post-process program
//! - `coordinator`: pass ordering, resize and uniform sync

mod capture;
mod coordinator;
mod error;
mod post;
mod target;
mod uniforms;

pub use capture::CaptureScene;
pub use coordinator::OpticalPipeline;
pub use error::PipelineError;
pub use post::PostProcessStage;
pub use target::{
    CaptureTarget, GpuTargetAllocator, Resizable, TargetAllocator, TargetSize,
    CAPTURE_COLOR_FORMAT, CAPTURE_DEPTH_FORMAT,
};
