//! Small CPU image used by optics tests.

use glam::{Vec2, Vec4};

use super::kernel::ImageSampler;

/// RGBA float image sampled like the capture texture: bilinear filtering,
/// clamp-to-edge addressing, texel centers at `(i + 0.5) / size`.
pub(crate) struct TestImage {
    width: usize,
    height: usize,
    texels: Vec<Vec4>,
}

impl TestImage {
    pub(crate) fn solid(width: usize, height: usize, color: Vec4) -> Self {
        Self { width, height, texels: vec![color; width * height] }
    }

    /// Smooth, asymmetric test pattern with detail at the blur scale.
    pub(crate) fn pattern(width: usize, height: usize) -> Self {
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (fx, fy) = (x as f32, y as f32);
                texels.push(Vec4::new(
                    0.5 + 0.5 * (fx * 0.9 + fy * 0.3).sin(),
                    0.5 + 0.5 * (fx * 0.17 - fy * 1.1).cos(),
                    (fx / width as f32) * (fy / height as f32),
                    1.0,
                ));
            }
        }
        Self { width, height, texels }
    }

    pub(crate) fn mirrored_x(&self) -> Self {
        let mut texels = Vec::with_capacity(self.texels.len());
        for y in 0..self.height {
            for x in (0..self.width).rev() {
                texels.push(self.texel(x as isize, y as isize));
            }
        }
        Self { width: self.width, height: self.height, texels }
    }

    fn texel(&self, x: isize, y: isize) -> Vec4 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.texels[y * self.width + x]
    }
}

impl ImageSampler for TestImage {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let px = uv.x * self.width as f32 - 0.5;
        let py = uv.y * self.height as f32 - 0.5;
        let (x0, y0) = (px.floor(), py.floor());
        let (tx, ty) = (px - x0, py - y0);
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), tx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), tx);
        top.lerp(bottom, ty)
    }
}
