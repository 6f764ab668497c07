use anyhow::Result;
use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle and metadata for the current frame.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window borrow carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Acquires the surface, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then submits and presents.
    ///
    /// `draw` owns every pass, including the one that covers the surface.
    /// Skipped frames (timeout, lost surface) return `Continue` without
    /// calling `draw`; an out-of-memory surface returns `Exit`.
    pub fn render<F>(&mut self, draw: F) -> Result<AppControl>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> Result<()>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let shown = err.to_string();
                return Ok(match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface error is fatal: {shown}");
                        AppControl::Exit
                    }
                    action => {
                        log::warn!("frame {} skipped ({shown}): {action:?}", self.time.frame_index);
                        AppControl::Continue
                    }
                });
            }
        };

        let rctx = RenderCtx::from_gpu(self.gpu);

        // Target borrows the frame encoder; it must end before submit takes the frame.
        {
            let mut target = RenderTarget {
                encoder: &mut frame.encoder,
                color_view: &frame.view,
            };
            draw(&rctx, &mut target)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}
