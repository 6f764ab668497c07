use glam::Vec3;

/// Linear RGB from a `0xRRGGBB` sRGB literal.
pub fn srgb_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// sRGB transfer function, decoded to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Light rig of the poster room. Colors are linear RGB.
///
/// Preset tables live with the host; this is the single default rig.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneLighting {
    pub background: Vec3,
    pub room_tint: Vec3,

    pub ambient_color: Vec3,
    pub ambient_intensity: f32,

    /// Directional key light, positioned like the light it models.
    pub key_position: Vec3,
    pub key_color: Vec3,
    pub key_intensity: f32,

    /// Point fill light with a linear cutoff at `fill_range`.
    pub fill_position: Vec3,
    pub fill_color: Vec3,
    pub fill_intensity: f32,
    pub fill_range: f32,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            background: srgb_hex(0xcfd6e2),
            room_tint: srgb_hex(0xeef2f8),
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.4,
            key_position: Vec3::new(2.5, 4.0, 2.5),
            key_color: Vec3::ONE,
            key_intensity: 1.0,
            fill_position: Vec3::new(-3.0, 1.8, -2.0),
            fill_color: srgb_hex(0xcfe4ff),
            fill_intensity: 0.25,
            fill_range: 25.0,
        }
    }
}

impl SceneLighting {
    /// Unit vector pointing from the scene toward the key light.
    pub fn key_direction(&self) -> Vec3 {
        self.key_position.try_normalize().unwrap_or(Vec3::Y)
    }

    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.background.x as f64,
            g: self.background.y as f64,
            b: self.background.z as f64,
            a: 1.0,
        }
    }
}
