use crate::device::Gpu;
use crate::pipeline::TargetSize;

/// Borrowed GPU handles a stage needs while recording a frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the presented surface (the post-process output).
    pub surface_format: wgpu::TextureFormat,
    /// Surface size in physical pixels, at least 1x1.
    pub size: TargetSize,
}

impl<'a> RenderCtx<'a> {
    /// Snapshots the handles of `gpu` for one frame.
    pub fn from_gpu(gpu: &'a Gpu<'_>) -> Self {
        let size = gpu.size();
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            surface_format: gpu.surface_format(),
            size: TargetSize::clamped(size.width, size.height),
        }
    }
}

/// Where the current frame is recorded: the frame encoder and the surface view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}
