use bytemuck::{Pod, Zeroable};

use crate::optics::{Eye, OpticalModel, OpticalSimulationConfig};

use super::target::TargetSize;

/// Uniform block consumed by `optics.wgsl`.
///
/// Layout must match `OpticsUniform` in the shader (112 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct OpticsUniform {
    /// sph, cyl, axis (degrees, `[0, 180)`), unused
    pub left_lens: [f32; 4],
    pub right_lens: [f32; 4],
    /// left center xy, right center xy
    pub centers: [f32; 4],
    pub resolution: [f32; 2],
    pub enabled: u32,
    pub _pad: u32,
    /// distortion gain, iso gain, iso max, aniso gain
    pub gains: [f32; 4],
    /// aniso max, perpendicular jitter, unused, unused
    pub limits: [f32; 4],
    /// center, iso, aniso tap weights (normalized), unused
    pub weights: [f32; 4],
}

impl OpticsUniform {
    pub(crate) fn pack(
        config: &OpticalSimulationConfig,
        model: &OpticalModel,
        resolution: TargetSize,
    ) -> Self {
        let lens = |eye: Eye| {
            let l = config.lens(eye).normalized();
            [l.sphere, l.cylinder, l.axis, 0.0]
        };
        let w = model.weights.normalized();

        Self {
            left_lens: lens(Eye::Left),
            right_lens: lens(Eye::Right),
            centers: [
                model.left_center.x,
                model.left_center.y,
                model.right_center.x,
                model.right_center.y,
            ],
            resolution: [resolution.width as f32, resolution.height as f32],
            enabled: config.enabled as u32,
            _pad: 0,
            gains: [model.distortion_gain, model.iso_gain, model.iso_max, model.aniso_gain],
            limits: [model.aniso_max, model.perp_jitter, 0.0, 0.0],
            weights: [w.center, w.iso, w.aniso, 0.0],
        }
    }

    pub(crate) fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<Self>() as u64)
            .expect("OpticsUniform has non-zero size by construction")
    }
}
