//! CPU reference of the per-pixel optical kernel.
//!
//! Mirrors `fs_optics` in `pipeline/shaders/optics.wgsl` step for step so the
//! image-level properties of the model can be checked without a GPU.

use glam::{Vec2, Vec4};

use super::lens::{Eye, LensProfile, OpticalSimulationConfig};
use super::model::OpticalModel;

/// Read access to the captured scene image in UV space.
pub trait ImageSampler {
    /// Filtered RGBA sample at `uv`.
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// One weighted sample offset relative to the warped coordinate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tap {
    pub offset: Vec2,
    pub weight: f32,
}

/// Number of taps per output pixel: center, four isotropic, four directional.
pub const TAP_COUNT: usize = 9;

/// Builds the blur taps for `lens` (expected to be normalized).
///
/// Weights are normalized so the taps always sum to one.
pub fn taps(model: &OpticalModel, lens: LensProfile) -> [Tap; TAP_COUNT] {
    let w = model.weights.normalized();
    let iso = model.iso_radius(lens.sphere);
    let aniso = model.aniso_radius(lens.cylinder);

    let axis = lens.axis.to_radians();
    let dir = Vec2::new(axis.cos(), axis.sin());
    // sign(0) counts as +1 so the jitter never collapses.
    let side = if lens.cylinder == 0.0 { 1.0 } else { lens.cylinder.signum() };
    let a = dir * aniso;
    let b = dir.perp() * (aniso * model.perp_jitter * side);

    let tap = |offset: Vec2, weight: f32| Tap { offset, weight };
    [
        tap(Vec2::ZERO, w.center),
        tap(Vec2::new(iso, 0.0), w.iso),
        tap(Vec2::new(-iso, 0.0), w.iso),
        tap(Vec2::new(0.0, iso), w.iso),
        tap(Vec2::new(0.0, -iso), w.iso),
        tap(a + b, w.aniso),
        tap(-a + b, w.aniso),
        tap(a - b, w.aniso),
        tap(-a - b, w.aniso),
    ]
}

/// Shades the output pixel at `uv`.
///
/// With the simulation disabled this is an identity copy of `image`.
/// Otherwise the pixel is warped around its eye's lens center and blurred;
/// alpha is always opaque.
pub fn shade<S: ImageSampler + ?Sized>(
    image: &S,
    uv: Vec2,
    config: &OpticalSimulationConfig,
    model: &OpticalModel,
) -> Vec4 {
    if !config.enabled {
        return image.sample(uv);
    }

    let eye = Eye::for_uv(uv);
    let lens = config.lens(eye).normalized();
    let warped = model.distort(uv, model.center(eye), lens.sphere);

    let rgb = taps(model, lens)
        .iter()
        .fold(glam::Vec3::ZERO, |acc, t| {
            acc + image.sample(warped + t.offset).truncate() * t.weight
        });

    rgb.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::test_image::TestImage;

    fn approx(a: Vec4, b: Vec4, tol: f32) -> bool {
        (a - b).abs().max_element() <= tol
    }

    fn sample_points() -> Vec<Vec2> {
        let mut pts = Vec::new();
        for j in 0..9 {
            for i in 0..17 {
                let uv = Vec2::new((i as f32 + 0.37) / 17.0, (j as f32 + 0.61) / 9.0);
                pts.push(uv);
            }
        }
        pts
    }

    fn lenses() -> Vec<LensProfile> {
        vec![
            LensProfile::default(),
            LensProfile::new(-8.0, -6.0, 90.0),
            LensProfile::new(4.5, -1.25, 170.0),
            LensProfile::new(-12.0, 0.0, 0.0),
            LensProfile::new(0.0, -2.0, 133.0),
        ]
    }

    #[test]
    fn disabled_is_an_identity_copy() {
        let img = TestImage::pattern(48, 24);
        for lens in lenses() {
            let cfg = OpticalSimulationConfig {
                enabled: false,
                left: lens,
                right: LensProfile::new(-3.0, -3.0, 45.0),
                ..Default::default()
            };
            for uv in sample_points() {
                assert_eq!(shade(&img, uv, &cfg, &OpticalModel::default()), img.sample(uv));
            }
        }
    }

    #[test]
    fn constant_image_is_preserved_for_any_lens() {
        let color = Vec4::new(0.8, 0.35, 0.1, 1.0);
        let img = TestImage::solid(32, 16, color);
        for lens in lenses() {
            let cfg = OpticalSimulationConfig {
                left: lens,
                right: lens,
                ..Default::default()
            };
            for uv in sample_points() {
                let out = shade(&img, uv, &cfg, &OpticalModel::default());
                assert!(approx(out, color, 1e-5), "lens {lens:?} at {uv:?}: {out:?}");
            }
        }
    }

    #[test]
    fn output_alpha_is_opaque() {
        let img = TestImage::solid(8, 8, Vec4::new(0.2, 0.2, 0.2, 0.25));
        let out = shade(&img, Vec2::new(0.3, 0.3), &OpticalSimulationConfig::default(), &OpticalModel::default());
        assert_eq!(out.w, 1.0);
    }

    #[test]
    fn mirrored_image_with_swapped_lenses_mirrors_output() {
        let img = TestImage::pattern(64, 32);
        let mirrored = img.mirrored_x();
        let model = OpticalModel::default();

        let left = LensProfile::new(-2.5, -3.25, 25.0);
        let right = LensProfile::new(1.0, -0.75, 110.0);
        let cfg = OpticalSimulationConfig { left, right, ..Default::default() };

        // Mirroring the image flips the cylinder axis about the vertical.
        let flip = |l: LensProfile| LensProfile { axis: 180.0 - l.axis, ..l };
        let mirror_cfg = OpticalSimulationConfig {
            left: flip(right),
            right: flip(left),
            ..Default::default()
        };

        for uv in sample_points() {
            if uv.x == 0.5 {
                continue;
            }
            let a = shade(&img, uv, &cfg, &model);
            let b = shade(&mirrored, Vec2::new(1.0 - uv.x, uv.y), &mirror_cfg, &model);
            assert!(approx(a, b, 1e-4), "at {uv:?}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn axis_is_periodic_over_180_degrees() {
        let img = TestImage::pattern(64, 32);
        let model = OpticalModel::default();
        for base in [0.0, 25.0, 90.0, 179.0] {
            let cfg = |axis: f32| OpticalSimulationConfig {
                left: LensProfile::new(-1.0, -4.0, axis),
                right: LensProfile::new(-1.0, -4.0, axis),
                ..Default::default()
            };
            let a = cfg(base);
            let b = cfg(base + 180.0);
            let c = cfg(base - 180.0);
            for uv in sample_points() {
                let oa = shade(&img, uv, &a, &model);
                assert!(approx(oa, shade(&img, uv, &b, &model), 1e-5));
                assert!(approx(oa, shade(&img, uv, &c, &model), 1e-5));
            }
        }
    }

    #[test]
    fn zero_power_returns_the_center_sample() {
        let img = TestImage::pattern(40, 20);
        let cfg = OpticalSimulationConfig {
            left: LensProfile::PLANO,
            right: LensProfile::new(0.0, 0.0, 77.0),
            ..Default::default()
        };
        for uv in sample_points() {
            let out = shade(&img, uv, &cfg, &OpticalModel::default());
            let expected = img.sample(uv).truncate().extend(1.0);
            assert!(approx(out, expected, 1e-5));
        }
    }

    #[test]
    fn taps_sum_to_one_and_come_in_symmetric_pairs() {
        let model = OpticalModel::default();
        let t = taps(&model, LensProfile::default());
        let total: f32 = t.iter().map(|t| t.weight).sum();
        assert!((total - 1.0).abs() < 1e-6);

        let sum: Vec2 = t.iter().map(|t| t.offset).sum();
        assert!(sum.length() < 1e-7);
    }

    #[test]
    fn cylinder_sign_flips_the_perpendicular_jitter() {
        let model = OpticalModel::default();
        let plus = taps(&model, LensProfile::new(0.0, 0.0, 0.0));
        // Zero radius: every directional tap collapses onto the center.
        assert!(plus[5..].iter().all(|t| t.offset == Vec2::ZERO));

        let neg = taps(&model, LensProfile::new(0.0, -2.0, 0.0));
        let pos = taps(&model, LensProfile::new(0.0, 2.0, 0.0));
        assert_eq!(neg[5].offset, pos[7].offset);
    }

    #[test]
    fn each_field_uses_its_own_lens() {
        let img = TestImage::pattern(64, 32);
        let model = OpticalModel::default();
        let cfg = OpticalSimulationConfig {
            left: LensProfile::PLANO,
            right: LensProfile::new(-6.0, -4.0, 30.0),
            ..Default::default()
        };
        let left_uv = Vec2::new(0.2, 0.4);
        let right_uv = Vec2::new(0.8, 0.4);

        let l = shade(&img, left_uv, &cfg, &model);
        assert!(approx(l, img.sample(left_uv).truncate().extend(1.0), 1e-5));

        let r = shade(&img, right_uv, &cfg, &model);
        assert!(!approx(r, img.sample(right_uv).truncate().extend(1.0), 1e-4));
    }
}
