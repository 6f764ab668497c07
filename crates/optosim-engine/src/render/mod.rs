//! Renderer-facing handles.
//!
//! Stages receive a [`RenderCtx`] (device, queue, output format and size) and
//! record into a [`RenderTarget`] (frame encoder + output view). Each stage
//! owns its own GPU resources.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
