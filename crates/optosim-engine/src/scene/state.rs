use super::lighting::SceneLighting;

const FEET_PER_METER: f32 = 3.28084;

/// Host-controlled scene parameters. Only the capture pass reads these.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    distance_m: f32,
    pub lighting: SceneLighting,
}

impl SceneState {
    /// Closest and farthest poster placement, in meters.
    ///
    /// The far limit keeps the poster in front of the room's back wall.
    pub const MIN_DISTANCE_M: f32 = 0.5;
    pub const MAX_DISTANCE_M: f32 = 20.0;

    pub fn new(distance_m: f32) -> Self {
        let mut state = Self {
            distance_m: Self::MIN_DISTANCE_M,
            lighting: SceneLighting::default(),
        };
        state.set_distance(distance_m);
        state
    }

    /// Viewer-to-poster distance in meters.
    #[inline]
    pub fn distance_m(&self) -> f32 {
        self.distance_m
    }

    #[inline]
    pub fn distance_ft(&self) -> f32 {
        self.distance_m * FEET_PER_METER
    }

    /// Sets the distance, clamped to the room. Non-finite input is ignored.
    pub fn set_distance(&mut self, meters: f32) {
        if meters.is_finite() {
            self.distance_m = meters.clamp(Self::MIN_DISTANCE_M, Self::MAX_DISTANCE_M);
        }
    }

    /// Moves the poster by `delta_m` and returns the new distance.
    pub fn nudge_distance(&mut self, delta_m: f32) -> f32 {
        self.set_distance(self.distance_m + delta_m);
        self.distance_m
    }

    /// Human-readable distance, e.g. `3.00 m (9.84 ft)`.
    pub fn distance_readout(&self) -> String {
        format!("{:.2} m ({:.2} ft)", self.distance_m, self.distance_ft())
    }
}

impl Default for SceneState {
    /// Three meters: a common eye-chart test distance.
    fn default() -> Self {
        Self::new(3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_shows_meters_and_feet() {
        assert_eq!(SceneState::new(3.0).distance_readout(), "3.00 m (9.84 ft)");
        assert_eq!(SceneState::new(6.1).distance_readout(), "6.10 m (20.01 ft)");
    }

    #[test]
    fn distance_is_clamped_to_the_room() {
        assert_eq!(SceneState::new(0.0).distance_m(), SceneState::MIN_DISTANCE_M);
        assert_eq!(SceneState::new(100.0).distance_m(), SceneState::MAX_DISTANCE_M);
    }

    #[test]
    fn non_finite_distance_is_ignored() {
        let mut s = SceneState::new(4.0);
        s.set_distance(f32::NAN);
        assert_eq!(s.distance_m(), 4.0);
    }

    #[test]
    fn nudge_accumulates_and_saturates() {
        let mut s = SceneState::new(1.0);
        assert_eq!(s.nudge_distance(0.25), 1.25);
        assert_eq!(s.nudge_distance(-5.0), SceneState::MIN_DISTANCE_M);
    }
}
