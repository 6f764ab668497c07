use crate::optics::{OpticalModel, OpticalSimulationConfig};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::Camera;

use super::capture::{encode_capture, CaptureScene};
use super::error::PipelineError;
use super::post::PostProcessStage;
use super::target::{GpuTargetAllocator, Resizable, TargetSize};

/// Runs the two passes of the lens simulation each frame.
///
/// 1. capture: `scene` through `camera` into the intermediate target
/// 2. post-process: one full-screen draw into the output view
///
/// Both passes are recorded on the same encoder, so the capture pass is
/// complete before the post-process pass samples its result.
pub struct OpticalPipeline {
    capture: Resizable<GpuTargetAllocator>,
    post: PostProcessStage,
    model: OpticalModel,
}

impl OpticalPipeline {
    /// Creates the pipeline for an output of `output_format`.
    ///
    /// No target is allocated until the first [`resize`](Self::resize) or frame.
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> Self {
        log::info!("creating optical pipeline (output {output_format:?})");
        Self {
            capture: Resizable::new(GpuTargetAllocator::new(device)),
            post: PostProcessStage::new(device, output_format),
            model: OpticalModel::default(),
        }
    }

    pub fn with_model(mut self, model: OpticalModel) -> Self {
        self.model = model;
        self
    }

    #[inline]
    pub fn model(&self) -> &OpticalModel {
        &self.model
    }

    /// Current intermediate target size, if allocated.
    #[inline]
    pub fn size(&self) -> Option<TargetSize> {
        self.capture.size()
    }

    /// Number of intermediate target allocations performed so far.
    #[inline]
    pub fn allocation_count(&self) -> u64 {
        self.capture.allocation_count()
    }

    /// Resizes the intermediate target to `(max(1, width), max(1, height))`.
    ///
    /// A no-op when the size is unchanged. Allocation failure is fatal and is
    /// returned to the caller.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), PipelineError> {
        let reallocated = self.capture.resize(width, height).inspect_err(|e| {
            log::error!("capture target allocation failed: {e}");
        })?;

        if !reallocated {
            log::debug!("resize {width}x{height}: target unchanged");
            return Ok(());
        }

        // The old bind group points at the released texture.
        self.post.unbind_source();
        if let Some(size) = self.capture.size() {
            self.post.set_resolution(size);
        }
        Ok(())
    }

    /// Renders one frame of `scene` through `camera` with the lens simulation applied.
    ///
    /// The intermediate target follows `config.viewport_size`. The final image
    /// is in `target.color_view` once the encoder is submitted.
    pub fn render_frame<S: CaptureScene + ?Sized>(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &mut S,
        camera: &Camera,
        config: &OpticalSimulationConfig,
    ) -> Result<(), PipelineError> {
        let (width, height) = config.viewport_size;
        self.resize(width, height)?;

        let generation = self.capture.allocation_count();
        let (Some(size), Some(capture)) = (self.capture.size(), self.capture.target()) else {
            return Err(PipelineError::NotAllocated);
        };

        scene.prepare(ctx, camera, size);
        encode_capture(target.encoder, capture, scene);

        self.post.update(ctx.queue, config, &self.model);
        self.post.bind_source(ctx.device, capture, generation);
        self.post.draw(target.encoder, target.color_view);

        Ok(())
    }
}
