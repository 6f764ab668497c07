use std::path::PathBuf;

use clap::Parser;
use optosim_engine::optics::{LensProfile, OpticalModel, OpticalSimulationConfig};
use optosim_engine::scene::SceneState;
use optosim_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

#[derive(Parser, Debug)]
#[command(
    name = "optosim",
    version,
    about = "View a wall poster through simulated spherocylindrical glasses"
)]
pub struct Args {
    /// Left lens sphere power in diopters.
    #[arg(long, value_name = "D", default_value_t = -0.25, allow_negative_numbers = true)]
    pub left_sph: f32,

    /// Left lens cylinder power in diopters.
    #[arg(long, value_name = "D", default_value_t = -3.25, allow_negative_numbers = true)]
    pub left_cyl: f32,

    /// Left lens cylinder axis in degrees.
    #[arg(long, value_name = "DEG", default_value_t = 25.0, allow_negative_numbers = true)]
    pub left_axis: f32,

    /// Right lens sphere power in diopters.
    #[arg(long, value_name = "D", default_value_t = -0.25, allow_negative_numbers = true)]
    pub right_sph: f32,

    /// Right lens cylinder power in diopters.
    #[arg(long, value_name = "D", default_value_t = -3.25, allow_negative_numbers = true)]
    pub right_cyl: f32,

    /// Right lens cylinder axis in degrees.
    #[arg(long, value_name = "DEG", default_value_t = 25.0, allow_negative_numbers = true)]
    pub right_axis: f32,

    /// Start with the simulation off (press G to toggle).
    #[arg(long)]
    pub no_glasses: bool,

    /// Radial warp per diopter of sphere (default 0.04).
    #[arg(long, value_name = "GAIN")]
    pub distortion_gain: Option<f32>,

    /// Isotropic blur radius per diopter of sphere, in UV units (default 0.0022).
    #[arg(long, value_name = "GAIN")]
    pub iso_gain: Option<f32>,

    /// Directional blur radius per diopter of cylinder, in UV units (default 0.003).
    #[arg(long, value_name = "GAIN")]
    pub aniso_gain: Option<f32>,

    /// Poster distance in meters (0.5-20).
    #[arg(long, value_name = "M", default_value_t = 3.0)]
    pub distance: f32,

    /// Poster artwork (PNG/JPEG/BMP). A blank card is used when omitted.
    #[arg(long, value_name = "PATH", env = "OPTOSIM_POSTER")]
    pub poster: Option<PathBuf>,

    /// Log filter in `env_logger` syntax (e.g. `debug`).
    #[arg(long, value_name = "FILTER", env = "OPTOSIM_LOG")]
    pub log: Option<String>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

impl Args {
    pub fn optical_config(&self) -> OpticalSimulationConfig {
        OpticalSimulationConfig {
            enabled: !self.no_glasses,
            left: LensProfile::new(self.left_sph, self.left_cyl, self.left_axis),
            right: LensProfile::new(self.right_sph, self.right_cyl, self.right_axis),
            ..OpticalSimulationConfig::default()
        }
    }

    /// The default model with any gain overrides applied.
    pub fn optical_model(&self) -> OpticalModel {
        let defaults = OpticalModel::default();
        OpticalModel {
            distortion_gain: self.distortion_gain.unwrap_or(defaults.distortion_gain),
            iso_gain: self.iso_gain.unwrap_or(defaults.iso_gain),
            aniso_gain: self.aniso_gain.unwrap_or(defaults.aniso_gain),
            ..defaults
        }
    }

    pub fn scene_state(&self) -> SceneState {
        SceneState::new(self.distance)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: "optosim".to_string(),
            initial_size: LogicalSize::new(self.width.max(1) as f64, self.height.max(1) as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("optosim").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_the_startup_lenses() {
        let config = parse(&[]).optical_config();
        assert!(config.enabled);
        assert_eq!(config.left, LensProfile::default());
        assert_eq!(config.right, LensProfile::default());
    }

    #[test]
    fn negative_powers_parse() {
        let config = parse(&["--left-sph", "-1.5", "--right-cyl", "-0.75"]).optical_config();
        assert_eq!(config.left.sphere, -1.5);
        assert_eq!(config.right.cylinder, -0.75);
    }

    #[test]
    fn no_glasses_disables_the_simulation() {
        assert!(!parse(&["--no-glasses"]).optical_config().enabled);
    }

    #[test]
    fn gain_overrides_keep_the_other_constants() {
        let model = parse(&["--aniso-gain", "0.006"]).optical_model();
        assert_eq!(model.aniso_gain, 0.006);
        assert_eq!(model.iso_gain, OpticalModel::default().iso_gain);
        assert_eq!(parse(&[]).optical_model(), OpticalModel::default());
    }

    #[test]
    fn distance_is_clamped_into_the_room() {
        let state = parse(&["--distance", "50"]).scene_state();
        assert_eq!(state.distance_m(), SceneState::MAX_DISTANCE_M);
    }

    #[test]
    fn window_size_comes_from_flags() {
        let rc = parse(&["--width", "640", "--height", "360"]).runtime_config();
        assert_eq!(rc.initial_size, LogicalSize::new(640.0, 360.0));
    }
}
