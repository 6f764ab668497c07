use anyhow::Result;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use optosim_engine::core::{App, AppControl, FrameCtx};
use optosim_engine::optics::{normalize_axis, OpticalModel, OpticalSimulationConfig};
use optosim_engine::pipeline::OpticalPipeline;
use optosim_engine::scene::{Camera, PosterImage, PosterRoom, SceneState};
use optosim_engine::time::FpsMeter;

/// Poster step for the arrow keys, in meters.
const DISTANCE_STEP_M: f32 = 0.25;
/// Sphere and cylinder step, in diopters.
const POWER_STEP_D: f32 = 0.25;
const AXIS_STEP_DEG: f32 = 5.0;

/// Lens parameter edited by a key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum LensField {
    Sphere,
    Cylinder,
    Axis,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Step {
    Up,
    Down,
}

impl Step {
    fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Host-side actions bound to keys.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Action {
    Exit,
    ToggleGlasses,
    SwitchLens,
    EditLens(LensField, Step),
    ResetLenses,
    PosterFarther,
    PosterCloser,
}

impl Action {
    fn for_key(code: KeyCode) -> Option<Self> {
        use LensField::*;
        Some(match code {
            KeyCode::Escape => Self::Exit,
            KeyCode::KeyG => Self::ToggleGlasses,
            KeyCode::Tab => Self::SwitchLens,
            KeyCode::KeyQ => Self::EditLens(Sphere, Step::Up),
            KeyCode::KeyA => Self::EditLens(Sphere, Step::Down),
            KeyCode::KeyW => Self::EditLens(Cylinder, Step::Up),
            KeyCode::KeyS => Self::EditLens(Cylinder, Step::Down),
            KeyCode::KeyE => Self::EditLens(Axis, Step::Up),
            KeyCode::KeyD => Self::EditLens(Axis, Step::Down),
            KeyCode::KeyR => Self::ResetLenses,
            KeyCode::ArrowUp => Self::PosterFarther,
            KeyCode::ArrowDown => Self::PosterCloser,
            _ => return None,
        })
    }

    /// Whether holding the key should keep applying the action.
    fn repeats(self) -> bool {
        matches!(
            self,
            Self::EditLens(..) | Self::PosterFarther | Self::PosterCloser
        )
    }
}

/// GPU state created on the first frame, once a device exists.
struct Gfx {
    pipeline: OpticalPipeline,
    room: PosterRoom,
}

pub struct StudioApp {
    config: OpticalSimulationConfig,
    model: OpticalModel,
    scene: SceneState,
    camera: Camera,
    poster: PosterImage,
    gfx: Option<Gfx>,
    fps: FpsMeter,
    title_dirty: bool,
}

impl StudioApp {
    pub fn new(config: OpticalSimulationConfig, scene: SceneState, poster: PosterImage) -> Self {
        Self {
            config,
            model: OpticalModel::default(),
            scene,
            camera: Camera::default(),
            poster,
            gfx: None,
            fps: FpsMeter::default(),
            title_dirty: true,
        }
    }

    pub fn with_model(mut self, model: OpticalModel) -> Self {
        self.model = model;
        self
    }

    fn edit_lens(&mut self, field: LensField, step: Step) {
        let eye = self.config.active;
        let lens = *self.config.lens(eye);
        let sign = step.sign();
        match field {
            LensField::Sphere => self.config.set_sphere(eye, lens.sphere + sign * POWER_STEP_D),
            LensField::Cylinder => {
                self.config.set_cylinder(eye, lens.cylinder + sign * POWER_STEP_D)
            }
            LensField::Axis => self
                .config
                .set_axis(eye, normalize_axis(lens.axis + sign * AXIS_STEP_DEG)),
        }
        log::info!("{}", self.config.lens(eye).readout(eye).join(", "));
    }

    fn apply(&mut self, action: Action) -> AppControl {
        match action {
            Action::Exit => {
                log::info!("exit requested");
                return AppControl::Exit;
            }
            Action::ToggleGlasses => {
                let enabled = !self.config.enabled;
                self.config.set_enabled(enabled);
                log::info!("glasses {}", if enabled { "on" } else { "off" });
            }
            Action::SwitchLens => {
                let eye = self.config.toggle_active();
                log::info!("editing {}", self.config.lens(eye).readout(eye).join(", "));
            }
            Action::EditLens(field, step) => self.edit_lens(field, step),
            Action::ResetLenses => {
                self.config.reset();
                log::info!("lenses reset");
            }
            Action::PosterFarther | Action::PosterCloser => {
                let step = if action == Action::PosterFarther {
                    DISTANCE_STEP_M
                } else {
                    -DISTANCE_STEP_M
                };
                self.scene.nudge_distance(step);
                log::info!("poster at {}", self.scene.distance_readout());
            }
        }
        self.title_dirty = true;
        AppControl::Continue
    }

    fn title(&self) -> String {
        let eye = self.config.active;
        let lens = self.config.active_lens().readout(eye).join("  ");
        let glasses = if self.config.enabled { "glasses on" } else { "glasses off" };
        format!(
            "optosim | {lens} | {} | {glasses}",
            self.scene.distance_readout()
        )
    }

    fn handle_key(&mut self, event: &KeyEvent) -> AppControl {
        if event.state != ElementState::Pressed {
            return AppControl::Continue;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return AppControl::Continue;
        };
        match Action::for_key(code) {
            Some(action) if !event.repeat || action.repeats() => self.apply(action),
            _ => AppControl::Continue,
        }
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let size = ctx.gpu.size();
        if size.width == 0 || size.height == 0 {
            // Minimized; nothing to present.
            return Ok(AppControl::Continue);
        }
        self.config.set_viewport_size(size.width, size.height);

        if let Some(fps) = self.fps.push(ctx.time.dt) {
            log::debug!("{fps:.1} fps at {}x{}", size.width, size.height);
        }
        if self.title_dirty {
            ctx.window.set_title(&self.title());
            self.title_dirty = false;
        }

        if self.gfx.is_none() {
            let (device, queue) = (ctx.gpu.device(), ctx.gpu.queue());
            let pipeline =
                OpticalPipeline::new(device, ctx.gpu.surface_format()).with_model(self.model);
            log::debug!("optical model: {:?}", pipeline.model());
            let room = PosterRoom::new(device, queue, &self.poster, self.scene.clone())?;
            self.gfx = Some(Gfx { pipeline, room });
        }
        let Some(gfx) = self.gfx.as_mut() else {
            return Ok(AppControl::Continue);
        };
        gfx.room.set_state(self.scene.clone());

        let (config, camera) = (&self.config, &self.camera);
        ctx.render(|rctx, target| {
            gfx.pipeline
                .render_frame(rctx, target, &mut gfx.room, camera, config)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optosim_engine::optics::{Eye, LensProfile};

    fn app() -> StudioApp {
        StudioApp::new(
            OpticalSimulationConfig::default(),
            SceneState::default(),
            PosterImage::blank_card(),
        )
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(Action::for_key(KeyCode::Escape), Some(Action::Exit));
        assert_eq!(Action::for_key(KeyCode::KeyG), Some(Action::ToggleGlasses));
        assert_eq!(Action::for_key(KeyCode::Tab), Some(Action::SwitchLens));
        assert_eq!(
            Action::for_key(KeyCode::KeyS),
            Some(Action::EditLens(LensField::Cylinder, Step::Down))
        );
        assert_eq!(Action::for_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn escape_exits() {
        assert_eq!(app().apply(Action::Exit), AppControl::Exit);
    }

    #[test]
    fn g_toggles_the_simulation() {
        let mut app = app();
        app.apply(Action::ToggleGlasses);
        assert!(!app.config.enabled);
        app.apply(Action::ToggleGlasses);
        assert!(app.config.enabled);
    }

    #[test]
    fn tab_switches_the_edited_lens() {
        let mut app = app();
        app.apply(Action::SwitchLens);
        assert_eq!(app.config.active, Eye::Right);
        assert!(app.title().contains("RIGHT SPH"));
    }

    #[test]
    fn edits_change_only_the_active_lens() {
        let mut app = app();
        app.apply(Action::EditLens(LensField::Sphere, Step::Down));
        app.apply(Action::EditLens(LensField::Cylinder, Step::Up));
        app.apply(Action::EditLens(LensField::Axis, Step::Up));

        let left = app.config.left;
        assert!(approx(left.sphere, -0.5));
        assert!(approx(left.cylinder, -3.0));
        assert!(approx(left.axis, 30.0));
        assert_eq!(app.config.right, LensProfile::default());

        app.apply(Action::SwitchLens);
        app.apply(Action::EditLens(LensField::Sphere, Step::Up));
        assert!(approx(app.config.right.sphere, 0.0));
        assert!(approx(app.config.left.sphere, -0.5));
    }

    #[test]
    fn axis_edits_wrap_around_180() {
        let mut app = app();
        app.config.set_axis(Eye::Left, 2.0);
        app.apply(Action::EditLens(LensField::Axis, Step::Down));
        assert!(approx(app.config.left.axis, 177.0));

        app.config.set_axis(Eye::Left, 178.0);
        app.apply(Action::EditLens(LensField::Axis, Step::Up));
        assert!(approx(app.config.left.axis, 3.0));
    }

    #[test]
    fn reset_restores_both_lenses() {
        let mut app = app();
        app.apply(Action::EditLens(LensField::Sphere, Step::Up));
        app.apply(Action::SwitchLens);
        app.apply(Action::EditLens(LensField::Cylinder, Step::Down));
        app.apply(Action::ResetLenses);
        assert_eq!(app.config.left, LensProfile::default());
        assert_eq!(app.config.right, LensProfile::default());
    }

    #[test]
    fn arrows_move_the_poster_in_quarter_meters() {
        let mut app = app();
        app.apply(Action::PosterFarther);
        assert!((app.scene.distance_m() - 3.25).abs() < 1e-6);
        app.apply(Action::PosterCloser);
        app.apply(Action::PosterCloser);
        assert!((app.scene.distance_m() - 2.75).abs() < 1e-6);
    }

    #[test]
    fn only_value_keys_repeat() {
        assert!(Action::PosterCloser.repeats());
        assert!(Action::EditLens(LensField::Axis, Step::Up).repeats());
        assert!(!Action::ToggleGlasses.repeats());
        assert!(!Action::SwitchLens.repeats());
    }
}
