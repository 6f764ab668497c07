//! Intermediate frame buffer ownership and sizing.

use super::error::PipelineError;

/// Color format of the captured scene (half float, filterable).
pub const CAPTURE_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Depth format used while capturing the scene.
pub const CAPTURE_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Render target size in physical pixels. Never smaller than 1x1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// Builds a size with both sides raised to at least one pixel.
    #[inline]
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }

    #[inline]
    pub fn extent(self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Allocates render targets of a given size.
///
/// Implemented over wgpu by [`GpuTargetAllocator`]; tests substitute a
/// counting allocator.
pub trait TargetAllocator {
    type Target;

    fn allocate(&mut self, size: TargetSize) -> Result<Self::Target, PipelineError>;
}

/// A render target that is reallocated only when its size changes.
///
/// Replacing the target drops the previous allocation; dropping the
/// `Resizable` releases the current one.
pub struct Resizable<A: TargetAllocator> {
    allocator: A,
    current: Option<(TargetSize, A::Target)>,
    allocations: u64,
}

impl<A: TargetAllocator> Resizable<A> {
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            current: None,
            allocations: 0,
        }
    }

    /// Ensures the target has `(max(1, width), max(1, height))` pixels.
    ///
    /// Returns `true` when a new target was allocated, `false` when the
    /// current one already had that size. On failure the previous target is
    /// kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, PipelineError> {
        let size = TargetSize::clamped(width, height);
        if self.size() == Some(size) {
            return Ok(false);
        }

        let target = self.allocator.allocate(size)?;
        self.current = Some((size, target));
        self.allocations += 1;
        Ok(true)
    }

    #[inline]
    pub fn size(&self) -> Option<TargetSize> {
        self.current.as_ref().map(|(size, _)| *size)
    }

    #[inline]
    pub fn target(&self) -> Option<&A::Target> {
        self.current.as_ref().map(|(_, target)| target)
    }

    /// Number of allocations performed so far.
    ///
    /// Also serves as a generation counter for resources derived from the target.
    #[inline]
    pub fn allocation_count(&self) -> u64 {
        self.allocations
    }
}

/// Color + depth attachments of the intermediate frame buffer.
pub struct CaptureTarget {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

/// Allocates [`CaptureTarget`]s on a wgpu device.
pub struct GpuTargetAllocator {
    device: wgpu::Device,
    max_dimension: u32,
}

impl GpuTargetAllocator {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            device: device.clone(),
            max_dimension: device.limits().max_texture_dimension_2d,
        }
    }
}

impl TargetAllocator for GpuTargetAllocator {
    type Target = CaptureTarget;

    fn allocate(&mut self, size: TargetSize) -> Result<CaptureTarget, PipelineError> {
        if size.width > self.max_dimension || size.height > self.max_dimension {
            return Err(PipelineError::TargetTooLarge {
                width: size.width,
                height: size.height,
                max: self.max_dimension,
            });
        }

        let color = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("optosim capture color"),
            size: size.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CAPTURE_COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("optosim capture depth"),
            size: size.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CAPTURE_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        log::info!("allocated capture target {}x{}", size.width, size.height);

        Ok(CaptureTarget {
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            color,
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every allocation request.
    #[derive(Default)]
    struct CountingAllocator {
        requests: Vec<TargetSize>,
        max: Option<u32>,
    }

    impl TargetAllocator for CountingAllocator {
        type Target = TargetSize;

        fn allocate(&mut self, size: TargetSize) -> Result<TargetSize, PipelineError> {
            if let Some(max) = self.max {
                if size.width > max || size.height > max {
                    return Err(PipelineError::TargetTooLarge {
                        width: size.width,
                        height: size.height,
                        max,
                    });
                }
            }
            self.requests.push(size);
            Ok(size)
        }
    }

    #[test]
    fn zero_size_allocates_one_by_one() {
        let mut t = Resizable::new(CountingAllocator::default());
        assert!(t.resize(0, 0).unwrap());
        assert_eq!(t.size(), Some(TargetSize { width: 1, height: 1 }));
        assert_eq!(t.target(), Some(&TargetSize { width: 1, height: 1 }));
    }

    #[test]
    fn zero_on_one_axis_clamps_only_that_axis() {
        let mut t = Resizable::new(CountingAllocator::default());
        t.resize(640, 0).unwrap();
        assert_eq!(t.size(), Some(TargetSize { width: 640, height: 1 }));
    }

    #[test]
    fn repeated_identical_sizes_do_not_reallocate() {
        let mut t = Resizable::new(CountingAllocator::default());
        assert!(t.resize(800, 400).unwrap());
        assert!(!t.resize(800, 400).unwrap());
        assert!(!t.resize(800, 400).unwrap());
        assert_eq!(t.allocation_count(), 1);
        assert_eq!(t.allocator.requests.len(), 1);
    }

    #[test]
    fn sizes_that_clamp_equal_are_identical() {
        let mut t = Resizable::new(CountingAllocator::default());
        t.resize(0, 0).unwrap();
        assert!(!t.resize(1, 1).unwrap());
        assert!(!t.resize(0, 1).unwrap());
        assert_eq!(t.allocation_count(), 1);
    }

    #[test]
    fn changed_size_reallocates() {
        let mut t = Resizable::new(CountingAllocator::default());
        t.resize(800, 400).unwrap();
        t.resize(1024, 400).unwrap();
        t.resize(800, 400).unwrap();
        assert_eq!(t.allocation_count(), 3);
        assert_eq!(t.size(), Some(TargetSize { width: 800, height: 400 }));
    }

    #[test]
    fn failed_allocation_keeps_previous_target() {
        let mut t = Resizable::new(CountingAllocator { max: Some(4096), ..Default::default() });
        t.resize(800, 400).unwrap();

        let err = t.resize(9000, 400).unwrap_err();
        assert_eq!(err, PipelineError::TargetTooLarge { width: 9000, height: 400, max: 4096 });
        assert_eq!(t.size(), Some(TargetSize { width: 800, height: 400 }));
        assert_eq!(t.allocation_count(), 1);
    }

    #[test]
    fn aspect_uses_clamped_size() {
        assert_eq!(TargetSize::clamped(800, 400).aspect(), 2.0);
        assert_eq!(TargetSize::clamped(0, 0).aspect(), 1.0);
    }
}
