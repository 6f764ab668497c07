//! Optical simulation engine.
//!
//! Renders a scene offscreen, then re-renders it through a per-eye
//! spherocylindrical lens model (radial warp plus an axis-oriented blur).
//!
//! - [`optics`]: lens parameters and the GPU-free reference of the shader
//! - [`pipeline`]: the two-pass wgpu pipeline
//! - [`scene`]: the poster room rendered by the first pass
//! - [`window`], [`core`], [`device`]: the winit/wgpu runtime hosting it

pub mod core;
pub mod device;
pub mod logging;
pub mod optics;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
