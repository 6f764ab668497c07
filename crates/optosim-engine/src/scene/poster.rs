use std::path::Path;

use anyhow::{Context, Result};

/// RGBA8 artwork shown on the poster plane.
///
/// Artwork generation is the host's concern; this only carries pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PosterImage {
    /// Wraps tightly packed RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "poster has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "poster pixel buffer is {} bytes, expected {expected} for {width}x{height}",
            pixels.len()
        );
        Ok(Self { width, height, pixels })
    }

    /// Decodes an image file (PNG, JPEG, BMP).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("failed to load poster image {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::info!("loaded poster {} ({width}x{height})", path.display());
        Self::from_rgba(width, height, img.into_raw())
    }

    /// Plain white card with a dark blue frame, used when no artwork is given.
    pub fn blank_card() -> Self {
        const W: u32 = 600;
        const H: u32 = 120;
        const FRAME: u32 = 4;
        let mut pixels = Vec::with_capacity((W * H * 4) as usize);
        for y in 0..H {
            for x in 0..W {
                let edge = x < FRAME || y < FRAME || x >= W - FRAME || y >= H - FRAME;
                let px = if edge { [0x27, 0x48, 0x75, 0xff] } else { [0xff; 4] };
                pixels.extend_from_slice(&px);
            }
        }
        Self { width: W, height: H, pixels }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fails when either side exceeds `max_dimension` texels.
    pub(crate) fn ensure_fits(&self, max_dimension: u32) -> Result<()> {
        anyhow::ensure!(
            self.width <= max_dimension && self.height <= max_dimension,
            "poster is {}x{}, the device supports at most {max_dimension} texels per side",
            self.width,
            self.height
        );
        Ok(())
    }

    /// Uploads the artwork as an sRGB texture.
    pub(crate) fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<wgpu::Texture> {
        self.ensure_fits(device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("optosim poster texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            size,
        );
        Ok(texture)
    }
}
