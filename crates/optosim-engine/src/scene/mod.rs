//! Capture scene: what the first pass renders.
//!
//! A pinhole [`Camera`] looks down a lit room at a poster hung at a
//! configurable distance. Poster artwork and light presets are supplied by
//! the host; this module only places and draws them.

mod camera;
mod lighting;
pub mod mesh;
mod poster;
mod room;
mod state;

pub use camera::Camera;
pub use lighting::{srgb_hex, srgb_to_linear, SceneLighting};
pub use poster::PosterImage;
pub use room::PosterRoom;
pub use state::SceneState;
