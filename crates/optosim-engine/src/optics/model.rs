use glam::Vec2;

use super::lens::Eye;

/// Relative weights of the three tap groups.
///
/// `iso` and `aniso` are per-tap weights; each group has four taps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TapWeights {
    pub center: f32,
    pub iso: f32,
    pub aniso: f32,
}

impl TapWeights {
    /// Sum over all nine taps.
    #[inline]
    pub fn total(self) -> f32 {
        self.center + 4.0 * self.iso + 4.0 * self.aniso
    }

    /// Scales the weights so the nine taps sum to one.
    ///
    /// Degenerate weights (non-positive or non-finite total) fall back to the
    /// center tap alone.
    pub fn normalized(self) -> Self {
        let total = self.total();
        if !(total.is_finite() && total > 0.0) {
            return Self { center: 1.0, iso: 0.0, aniso: 0.0 };
        }
        Self {
            center: self.center / total,
            iso: self.iso / total,
            aniso: self.aniso / total,
        }
    }
}

impl Default for TapWeights {
    fn default() -> Self {
        Self { center: 0.26, iso: 0.11, aniso: 0.12 }
    }
}

/// Tunable constants of the perceptual lens model.
///
/// Radii are in normalized UV units, so their on-screen footprint scales with
/// the render target size. The defaults reproduce the reference tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OpticalModel {
    /// Radial warp strength per diopter of sphere.
    pub distortion_gain: f32,
    /// Isotropic blur radius per diopter of sphere.
    pub iso_gain: f32,
    pub iso_max: f32,
    /// Directional blur radius per diopter of cylinder.
    pub aniso_gain: f32,
    pub aniso_max: f32,
    /// Perpendicular spread of the directional taps, as a fraction of their radius.
    pub perp_jitter: f32,
    pub weights: TapWeights,
    pub left_center: Vec2,
    pub right_center: Vec2,
}

impl Default for OpticalModel {
    fn default() -> Self {
        Self {
            distortion_gain: 0.04,
            iso_gain: 0.0022,
            iso_max: 0.018,
            aniso_gain: 0.003,
            aniso_max: 0.024,
            perp_jitter: 0.3,
            weights: TapWeights::default(),
            left_center: Vec2::new(0.25, 0.5),
            right_center: Vec2::new(0.75, 0.5),
        }
    }
}

impl OpticalModel {
    /// Lens center of `eye` in UV space.
    #[inline]
    pub fn center(&self, eye: Eye) -> Vec2 {
        match eye {
            Eye::Left => self.left_center,
            Eye::Right => self.right_center,
        }
    }

    /// Isotropic blur radius for a sphere power, clamped to `[0, iso_max]`.
    #[inline]
    pub fn iso_radius(&self, sphere: f32) -> f32 {
        clamp_radius(sphere.abs() * self.iso_gain, self.iso_max)
    }

    /// Directional blur radius for a cylinder power, clamped to `[0, aniso_max]`.
    #[inline]
    pub fn aniso_radius(&self, cylinder: f32) -> f32 {
        clamp_radius(cylinder.abs() * self.aniso_gain, self.aniso_max)
    }

    /// Radially warps `uv` around `center`; the pull grows with the squared radius.
    ///
    /// Negative `sphere` pulls samples toward the center.
    #[inline]
    pub fn distort(&self, uv: Vec2, center: Vec2, sphere: f32) -> Vec2 {
        let d = uv - center;
        let r2 = d.dot(d);
        let k = sphere * self.distortion_gain;
        uv + d * r2 * k
    }
}

// Mirrors GLSL `clamp(x, 0.0, max)` without panicking on a negative max.
#[inline]
fn clamp_radius(r: f32, max: f32) -> f32 {
    r.max(0.0).min(max.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-7
    }

    #[test]
    fn reference_scenario_radii() {
        let m = OpticalModel::default();
        assert!(close(m.iso_radius(-0.25), 0.00055));
        assert!(close(m.aniso_radius(-3.25), 0.00975));
    }

    #[test]
    fn aniso_radius_grows_then_plateaus() {
        let m = OpticalModel::default();
        let mut prev = m.aniso_radius(0.0);
        assert_eq!(prev, 0.0);

        // 0.024 / 0.003 = 8 diopters saturates the radius.
        for step in 1..=32 {
            let cyl = -(step as f32) * 0.25;
            let r = m.aniso_radius(cyl);
            if cyl.abs() < 8.0 {
                assert!(r > prev, "radius must grow at cyl={cyl}");
            } else {
                assert!(close(r, m.aniso_max), "radius must plateau at cyl={cyl}");
            }
            prev = r;
        }
    }

    #[test]
    fn iso_radius_is_sign_independent_and_clamped() {
        let m = OpticalModel::default();
        assert_eq!(m.iso_radius(2.0), m.iso_radius(-2.0));
        assert!(close(m.iso_radius(-12.0), m.iso_max));
    }

    #[test]
    fn negative_max_clamps_to_zero() {
        let m = OpticalModel { aniso_max: -1.0, ..OpticalModel::default() };
        assert_eq!(m.aniso_radius(-3.0), 0.0);
    }

    #[test]
    fn myopic_sphere_pulls_toward_center() {
        let m = OpticalModel::default();
        let center = m.center(Eye::Left);
        let uv = Vec2::new(0.0, 0.1);
        let warped = m.distort(uv, center, -6.0);
        assert!(warped.distance(center) < uv.distance(center));

        let plus = m.distort(uv, center, 6.0);
        assert!(plus.distance(center) > uv.distance(center));
    }

    #[test]
    fn zero_sphere_is_no_warp() {
        let m = OpticalModel::default();
        let uv = Vec2::new(0.13, 0.91);
        assert_eq!(m.distort(uv, m.center(Eye::Left), 0.0), uv);
    }

    #[test]
    fn reference_weights_normalize_to_one() {
        let w = TapWeights::default();
        assert!((w.total() - 1.18).abs() < 1e-6);
        assert!((w.normalized().total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_weights_fall_back_to_center() {
        let w = TapWeights { center: 0.0, iso: 0.0, aniso: 0.0 }.normalized();
        assert_eq!(w, TapWeights { center: 1.0, iso: 0.0, aniso: 0.0 });
    }
}
