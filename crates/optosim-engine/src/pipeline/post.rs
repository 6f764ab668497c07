use crate::optics::{OpticalModel, OpticalSimulationConfig};

use super::target::{CaptureTarget, TargetSize};
use super::uniforms::OpticsUniform;

/// Second pass: samples the captured scene and writes the simulated view.
///
/// Owns its pipeline, sampler and uniform buffer. The bind group referencing
/// the capture texture is rebuilt whenever the target is reallocated; it is
/// never used across a reallocation.
pub struct PostProcessStage {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,

    /// Bind group plus the target generation it was built for.
    bind_group: Option<(u64, wgpu::BindGroup)>,

    resolution: TargetSize,
    uploaded: Option<OpticsUniform>,
}

impl PostProcessStage {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("optosim optics shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/optics.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("optosim optics bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(OpticsUniform::min_binding_size()),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("optosim optics pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("optosim optics pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fullscreen"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_optics"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: output_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Taps may land outside [0,1]; repeat the border instead of wrapping.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("optosim capture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("optosim optics ubo"),
            size: std::mem::size_of::<OpticsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            uniform_buffer,
            bind_group: None,
            resolution: TargetSize::clamped(1, 1),
            uploaded: None,
        }
    }

    /// Records the size of the target being sampled.
    pub fn set_resolution(&mut self, size: TargetSize) {
        self.resolution = size;
    }

    #[inline]
    pub fn resolution(&self) -> TargetSize {
        self.resolution
    }

    /// Uploads the uniforms for this frame if anything changed since the last upload.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        config: &OpticalSimulationConfig,
        model: &OpticalModel,
    ) {
        let packed = OpticsUniform::pack(config, model, self.resolution);
        if self.uploaded == Some(packed) {
            return;
        }

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&packed));
        self.uploaded = Some(packed);
        log::debug!(
            "optics uniforms uploaded: enabled={} left={:?} right={:?}",
            config.enabled,
            packed.left_lens,
            packed.right_lens
        );
    }

    /// Points the stage at `source`, rebuilding the bind group for a new generation.
    pub fn bind_source(&mut self, device: &wgpu::Device, source: &CaptureTarget, generation: u64) {
        if matches!(self.bind_group, Some((g, _)) if g == generation) {
            return;
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("optosim optics bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        });
        self.bind_group = Some((generation, bind_group));
    }

    /// Drops the bind group so the released target is no longer referenced.
    pub fn unbind_source(&mut self) {
        self.bind_group = None;
    }

    /// Encodes the full-screen pass into `output`.
    ///
    /// Does nothing until [`bind_source`](Self::bind_source) has been called.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        let Some((_, bind_group)) = self.bind_group.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("optosim optics pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
