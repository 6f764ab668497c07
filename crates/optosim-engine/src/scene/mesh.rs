//! CPU mesh builders for the capture scene.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    fn base(&self) -> u16 {
        u16::try_from(self.vertices.len()).expect("mesh exceeds u16 index range")
    }

    /// Corners in counter-clockwise order as seen from the side `normal` points to.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        const UVS: [Vec2; 4] = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        let base = self.base();
        for (corner, uv) in corners.into_iter().zip(UVS) {
            self.vertices.push(Vertex::new(corner, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Axis-aligned box centered at the origin, lit and wound for viewing from inside.
pub fn cuboid_inward(size: Vec3) -> MeshData {
    let h = size * 0.5;
    // (outward normal, u tangent, v tangent)
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (n, u, v) in faces {
        let center = n * h;
        let (hu, hv) = (u * h, v * h);
        // Reversed order: front faces point into the box.
        mesh.push_quad(
            [center - hu + hv, center + hu + hv, center + hu - hv, center - hu - hv],
            -n,
        );
    }
    mesh
}

/// Rectangle in the XY plane facing +Z; uv `(0, 0)` is the top-left corner.
pub fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

/// Capped cylinder centered at the origin with its axis along X.
pub fn cylinder_x(radius: f32, length: f32, segments: u16) -> MeshData {
    let segments = segments.max(3);
    let hl = length * 0.5;
    let ring = |i: u16| {
        let t = i as f32 / segments as f32 * std::f32::consts::TAU;
        Vec3::new(0.0, t.cos(), t.sin())
    };

    let mut mesh = MeshData::default();

    // Side: pairs of (left, right) vertices around the ring, seam duplicated.
    let side = mesh.base();
    for i in 0..=segments {
        let n = ring(i);
        let u = i as f32 / segments as f32;
        mesh.vertices.push(Vertex::new(Vec3::new(-hl, 0.0, 0.0) + n * radius, n, Vec2::new(u, 1.0)));
        mesh.vertices.push(Vertex::new(Vec3::new(hl, 0.0, 0.0) + n * radius, n, Vec2::new(u, 0.0)));
    }
    for i in 0..segments {
        let a = side + i * 2;
        let b = a + 2;
        mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
    }

    // Caps: triangle fans.
    for (x, normal) in [(-hl, Vec3::NEG_X), (hl, Vec3::X)] {
        let center = mesh.base();
        mesh.vertices.push(Vertex::new(Vec3::new(x, 0.0, 0.0), normal, Vec2::splat(0.5)));
        for i in 0..segments {
            let n = ring(i);
            let uv = Vec2::new(0.5 + n.y * 0.5, 0.5 + n.z * 0.5);
            mesh.vertices.push(Vertex::new(Vec3::new(x, 0.0, 0.0) + n * radius, normal, uv));
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % segments;
            if normal.x > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    mesh
}
