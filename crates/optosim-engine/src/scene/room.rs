use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::pipeline::{CaptureScene, TargetSize, CAPTURE_COLOR_FORMAT, CAPTURE_DEPTH_FORMAT};
use crate::render::RenderCtx;

use super::camera::Camera;
use super::lighting::{srgb_hex, SceneLighting};
use super::mesh::{self, MeshData, Vertex};
use super::poster::PosterImage;
use super::state::SceneState;

const ROOM_SIZE: Vec3 = Vec3::new(18.0, 6.0, 28.0);
const ROOM_CENTER: Vec3 = Vec3::new(0.0, 2.4, -8.0);

const POSTER_WIDTH: f32 = 5.0;
const POSTER_HEIGHT: f32 = 1.0;
const POSTER_HEIGHT_Y: f32 = 1.6;

const SUPPORT_RADIUS: f32 = 0.018;
const SUPPORT_LENGTH: f32 = 5.25;
const SUPPORT_Y: f32 = 2.2;
/// The bar hangs just behind the poster.
const SUPPORT_SETBACK: f32 = 0.03;
const SUPPORT_COLOR: u32 = 0x445166;

pub(crate) fn poster_transform(distance_m: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, POSTER_HEIGHT_Y, -distance_m))
}

pub(crate) fn support_transform(distance_m: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, SUPPORT_Y, -distance_m - SUPPORT_SETBACK))
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    key_dir: [f32; 4],
    key_color: [f32; 4],
    fill_pos: [f32; 4],
    fill_color: [f32; 4],
}

impl FrameUniform {
    fn new(camera: &Camera, lighting: &SceneLighting, size: TargetSize) -> Self {
        let l = lighting;
        Self {
            view_proj: camera.view_projection(size.aspect()).to_cols_array_2d(),
            ambient: (l.ambient_color * l.ambient_intensity).extend(1.0).to_array(),
            key_dir: l.key_direction().extend(0.0).to_array(),
            key_color: (l.key_color * l.key_intensity).extend(1.0).to_array(),
            fill_pos: l.fill_position.extend(l.fill_range).to_array(),
            fill_color: (l.fill_color * l.fill_intensity).extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    /// x: how much of the albedo texture to apply
    params: [f32; 4],
}

/// GPU resources of one drawable.
struct SceneObject {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    textured: bool,
}

impl SceneObject {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        mesh: &MeshData,
        albedo: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        textured: bool,
    ) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<ObjectUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = object_bind_group(device, layout, &ubo, albedo, sampler);

        Self {
            vbo,
            ibo,
            index_count: mesh.index_count(),
            ubo,
            bind_group,
            textured,
        }
    }

    fn write(&self, queue: &wgpu::Queue, model: Mat4, color: Vec3) {
        let u = ObjectUniform {
            model: model.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
            params: [if self.textured { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        };
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&u));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        pass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    ubo: &wgpu::Buffer,
    albedo: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("optosim object bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(albedo),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// The examination room: walls, the poster and its support bar.
///
/// Implements [`CaptureScene`]; the optical pipeline renders it into the
/// intermediate target each frame.
pub struct PosterRoom {
    pipeline: wgpu::RenderPipeline,
    frame_ubo: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    _white: wgpu::Texture,
    _poster: wgpu::Texture,

    room: SceneObject,
    poster: SceneObject,
    support: SceneObject,

    state: SceneState,
    objects_dirty: bool,
}

impl PosterRoom {
    /// Builds the scene resources and uploads `artwork`.
    ///
    /// Fails when the artwork is larger than the device's texture limit.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        artwork: &PosterImage,
        state: SceneState,
    ) -> Result<Self> {
        let poster_texture = artwork
            .upload(device, queue)
            .context("failed to upload poster artwork")?;
        let poster_view = poster_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("optosim scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("optosim scene frame bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<FrameUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("optosim scene object bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<ObjectUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("optosim scene pipeline layout"),
            bind_group_layouts: &[&frame_bgl, &object_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("optosim scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_scene"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_scene"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: CAPTURE_COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: CAPTURE_DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let frame_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("optosim scene frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("optosim scene frame bind group"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("optosim albedo sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = PosterImage::from_rgba(1, 1, vec![0xff; 4])?.upload(device, queue)?;
        let white_view = white.create_view(&wgpu::TextureViewDescriptor::default());

        let room = SceneObject::new(
            device,
            &object_bgl,
            "optosim room",
            &mesh::cuboid_inward(ROOM_SIZE),
            &white_view,
            &sampler,
            false,
        );
        let poster = SceneObject::new(
            device,
            &object_bgl,
            "optosim poster",
            &mesh::plane(POSTER_WIDTH, POSTER_HEIGHT),
            &poster_view,
            &sampler,
            true,
        );
        let support = SceneObject::new(
            device,
            &object_bgl,
            "optosim support bar",
            &mesh::cylinder_x(SUPPORT_RADIUS, SUPPORT_LENGTH, 20),
            &white_view,
            &sampler,
            false,
        );

        log::info!("poster room ready: {}", state.distance_readout());

        Ok(Self {
            pipeline,
            frame_ubo,
            frame_bind_group,
            _white: white,
            _poster: poster_texture,
            room,
            poster,
            support,
            state,
            objects_dirty: true,
        })
    }

    /// Replaces the scene state; transforms are rewritten on the next frame.
    pub fn set_state(&mut self, state: SceneState) {
        if self.state != state {
            self.state = state;
            self.objects_dirty = true;
        }
    }

    fn write_objects(&mut self, queue: &wgpu::Queue) {
        let d = self.state.distance_m();
        let lighting = &self.state.lighting;

        self.room
            .write(queue, Mat4::from_translation(ROOM_CENTER), lighting.room_tint);
        self.poster.write(queue, poster_transform(d), Vec3::ONE);
        self.support
            .write(queue, support_transform(d), srgb_hex(SUPPORT_COLOR));

        self.objects_dirty = false;
    }
}

impl CaptureScene for PosterRoom {
    fn clear_color(&self) -> wgpu::Color {
        self.state.lighting.clear_color()
    }

    fn prepare(&mut self, ctx: &RenderCtx<'_>, camera: &Camera, size: TargetSize) {
        let frame = FrameUniform::new(camera, &self.state.lighting, size);
        ctx.queue
            .write_buffer(&self.frame_ubo, 0, bytemuck::bytes_of(&frame));

        if self.objects_dirty {
            self.write_objects(ctx.queue);
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for object in [&self.room, &self.poster, &self.support] {
            object.draw(pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_sits_at_the_viewing_distance() {
        let t = poster_transform(3.0).w_axis;
        assert_eq!(t.truncate(), Vec3::new(0.0, 1.6, -3.0));
    }

    #[test]
    fn support_bar_hangs_behind_and_above_the_poster() {
        let poster = poster_transform(4.5).w_axis.truncate();
        let bar = support_transform(4.5).w_axis.truncate();
        assert!(bar.z < poster.z);
        assert!(bar.y - SUPPORT_RADIUS > poster.y + POSTER_HEIGHT * 0.5);
    }

    #[test]
    fn farthest_poster_stays_inside_the_room() {
        let back_wall = ROOM_CENTER.z - ROOM_SIZE.z * 0.5;
        let bar = support_transform(SceneState::MAX_DISTANCE_M).w_axis;
        assert!(bar.z > back_wall);
    }

    #[test]
    fn frame_uniform_scales_light_colors_by_intensity() {
        let lighting = SceneLighting::default();
        let u = FrameUniform::new(&Camera::default(), &lighting, TargetSize::clamped(800, 400));
        assert_eq!(u.ambient, [0.4, 0.4, 0.4, 1.0]);
        assert_eq!(u.fill_pos[3], 25.0);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 144);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
    }
}
