use crate::render::RenderCtx;
use crate::scene::Camera;

use super::target::{CaptureTarget, TargetSize};

/// A scene the capture stage can rasterize into the intermediate target.
///
/// Implementors build pipelines against
/// [`CAPTURE_COLOR_FORMAT`](super::CAPTURE_COLOR_FORMAT) and
/// [`CAPTURE_DEPTH_FORMAT`](super::CAPTURE_DEPTH_FORMAT).
pub trait CaptureScene {
    /// Background color the target is cleared to.
    fn clear_color(&self) -> wgpu::Color;

    /// Uploads per-frame data (camera, lights, transforms).
    fn prepare(&mut self, ctx: &RenderCtx<'_>, camera: &Camera, size: TargetSize);

    /// Records draw calls into the open capture pass.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// First pass: renders `scene` into the color + depth attachments of `target`.
pub(crate) fn encode_capture<S: CaptureScene + ?Sized>(
    encoder: &mut wgpu::CommandEncoder,
    target: &CaptureTarget,
    scene: &S,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("optosim capture pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(scene.clear_color()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &target.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    scene.draw(&mut rpass);
}
