use glam::{Mat4, Vec3};

/// Pinhole camera used by the capture pass.
///
/// The aspect ratio is not stored; it comes from the capture target each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Viewing direction (need not be unit length).
    pub forward: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    /// Standing eye height, looking straight down the room toward the poster.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 0.0),
            forward: Vec3::NEG_Z,
            fov_y_deg: 50.0,
            near: 0.05,
            far: 80.0,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, Vec3::Y)
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_straight_ahead_lands_at_screen_center() {
        let cam = Camera::default();
        let clip = cam.view_projection(2.0).project_point3(Vec3::new(0.0, 1.6, -3.0));
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn poster_edges_fit_a_wide_viewport_at_three_meters() {
        let cam = Camera::default();
        let vp = cam.view_projection(2.0);
        for x in [-2.5, 2.5] {
            let p = vp.project_point3(Vec3::new(x, 1.6, -3.0));
            assert!(p.x.abs() < 1.0, "x={x} projected to {p:?}");
        }
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let cam = Camera::default();
        assert_eq!(cam.projection(0.0), cam.projection(1.0));
        assert_eq!(cam.projection(f32::NAN), cam.projection(1.0));
    }
}
