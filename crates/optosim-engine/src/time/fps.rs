/// Averages frame times over a fixed window of wall time.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window_s: f32,
    elapsed_s: f32,
    frames: u32,
}

impl FpsMeter {
    pub fn new(window_s: f32) -> Self {
        Self {
            window_s: window_s.max(f32::EPSILON),
            elapsed_s: 0.0,
            frames: 0,
        }
    }

    /// Records one frame of `dt` seconds. Returns the average frame rate
    /// each time a full window has elapsed.
    pub fn push(&mut self, dt: f32) -> Option<f32> {
        self.elapsed_s += dt.max(0.0);
        self.frames += 1;

        if self.elapsed_s < self.window_s {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed_s;
        self.elapsed_s = 0.0;
        self.frames = 0;
        Some(fps)
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut m = FpsMeter::new(1.0);
        let reports: Vec<f32> = (0..32).filter_map(|_| m.push(0.0625)).collect();
        assert_eq!(reports, vec![16.0, 16.0]);
    }

    #[test]
    fn nothing_before_the_window_fills() {
        let mut m = FpsMeter::new(2.0);
        assert_eq!(m.push(0.5), None);
        assert_eq!(m.push(0.5), None);
    }
}
