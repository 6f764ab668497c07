use glam::Vec2;

/// Which ocular field a lens (or an output pixel) belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const ALL: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Returns the eye owning the output pixel at `uv`.
    ///
    /// The left field includes the seam (`uv.x == 0.5`).
    #[inline]
    pub fn for_uv(uv: Vec2) -> Self {
        if uv.x <= 0.5 { Eye::Left } else { Eye::Right }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Eye::Left => Eye::Right,
            Eye::Right => Eye::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Eye::Left => "LEFT",
            Eye::Right => "RIGHT",
        }
    }
}

/// Spherocylindrical prescription for one eye.
///
/// Values are diopters (`sphere`, `cylinder`) and degrees (`axis`). Setters
/// accept any real number; out-of-range powers only saturate the blur radii.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LensProfile {
    /// Defocus correction; negative is myopic.
    pub sphere: f32,
    /// Astigmatic correction magnitude.
    pub cylinder: f32,
    /// Cylinder orientation in degrees, meaningful modulo 180.
    pub axis: f32,
}

impl LensProfile {
    #[inline]
    pub const fn new(sphere: f32, cylinder: f32, axis: f32) -> Self {
        Self { sphere, cylinder, axis }
    }

    /// No refractive power at all.
    pub const PLANO: LensProfile = LensProfile::new(0.0, 0.0, 0.0);

    /// Returns a copy that is safe to hand to the post-process stage.
    ///
    /// `axis` is wrapped into `[0, 180)` and non-finite fields become `0`.
    pub fn normalized(self) -> Self {
        Self {
            sphere: finite_or_zero(self.sphere),
            cylinder: finite_or_zero(self.cylinder),
            axis: normalize_axis(self.axis),
        }
    }

    /// Returns the `SPH`, `CYL` and `Axis` readouts for this lens.
    pub fn readout(&self, eye: Eye) -> [String; 3] {
        let label = eye.label();
        [
            format!("{label} SPH: {:.2}", self.sphere),
            format!("{label} CYL: {:.2}", self.cylinder),
            format!("{label} Axis: {:.0}°", self.axis),
        ]
    }
}

impl Default for LensProfile {
    fn default() -> Self {
        Self::new(-0.25, -3.25, 25.0)
    }
}

/// Wraps an axis in degrees into `[0, 180)`.
pub fn normalize_axis(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(180.0);
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if wrapped >= 180.0 { 0.0 } else { wrapped }
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Process-lifetime optical simulation state.
///
/// Owned by the host and passed by reference into
/// [`OpticalPipeline::render_frame`](crate::pipeline::OpticalPipeline::render_frame).
/// Every mutator is a plain field assignment; the next rendered frame picks
/// the new values up.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalSimulationConfig {
    /// When false the post-process stage is an identity copy.
    pub enabled: bool,
    pub left: LensProfile,
    pub right: LensProfile,
    /// Lens currently targeted by host-side editing.
    pub active: Eye,
    /// Render surface size in physical pixels.
    pub viewport_size: (u32, u32),
}

impl Default for OpticalSimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            left: LensProfile::default(),
            right: LensProfile::default(),
            active: Eye::Left,
            viewport_size: (1, 1),
        }
    }
}

impl OpticalSimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn lens(&self, eye: Eye) -> &LensProfile {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }

    #[inline]
    pub fn lens_mut(&mut self, eye: Eye) -> &mut LensProfile {
        match eye {
            Eye::Left => &mut self.left,
            Eye::Right => &mut self.right,
        }
    }

    pub fn set_sphere(&mut self, eye: Eye, value: f32) {
        self.lens_mut(eye).sphere = value;
    }

    pub fn set_cylinder(&mut self, eye: Eye, value: f32) {
        self.lens_mut(eye).cylinder = value;
    }

    pub fn set_axis(&mut self, eye: Eye, value: f32) {
        self.lens_mut(eye).axis = value;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_active(&mut self, eye: Eye) {
        self.active = eye;
    }

    /// Switches editing to the other lens and returns it.
    pub fn toggle_active(&mut self) -> Eye {
        self.active = self.active.other();
        self.active
    }

    pub fn active_lens(&self) -> &LensProfile {
        self.lens(self.active)
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport_size = (width, height);
    }

    /// Restores the startup prescription and flags, keeping the viewport size.
    pub fn reset(&mut self) {
        let viewport_size = self.viewport_size;
        *self = Self {
            viewport_size,
            ..Self::default()
        };
    }
}
