use thiserror::Error;

/// Failures the render pipeline reports to its host.
///
/// All of these are fatal for rendering: no frame can be produced without a
/// valid intermediate target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The requested intermediate buffer exceeds what the device can allocate.
    #[error("intermediate target {width}x{height} exceeds device limit of {max}px per side")]
    TargetTooLarge { width: u32, height: u32, max: u32 },

    /// A frame was requested before any target was allocated.
    #[error("intermediate target has not been allocated")]
    NotAllocated,
}
