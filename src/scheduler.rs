//! Fixed-timestep scheduler
//!
//! Turns the variable time between render callbacks into a whole number of
//! uniform simulation steps. Leftover time carries over in the accumulator.

use crate::consts::{FIXED_STEP_MS, MAX_FRAME_DELTA_MS};
use crate::settings::Settings;

/// Accumulator-based fixed-step clock
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step_ms: f64,
    max_delta_ms: f64,
    max_substeps: Option<u32>,
    accumulator: f64,
    last_time: Option<f64>,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FIXED_STEP_MS, MAX_FRAME_DELTA_MS)
    }
}

impl FixedTimestep {
    pub fn new(step_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            step_ms,
            max_delta_ms,
            max_substeps: None,
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_substeps: settings.max_substeps.map(|cap| cap.max(1)),
            ..Self::new(settings.step_ms(), settings.max_frame_delta_ms)
        }
    }

    /// Cap the number of steps a single frame may run
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = Some(max_substeps.max(1));
        self
    }

    #[inline]
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Register a render callback at `now_ms` and return how many steps are due.
    /// The first callback only records the timestamp.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_time.replace(now_ms) else {
            return 0;
        };
        self.advance_by(now_ms - last)
    }

    /// Feed a raw frame delta and return how many steps are due
    pub fn advance_by(&mut self, delta_ms: f64) -> u32 {
        let mut delta = delta_ms.max(0.0);
        if delta > self.max_delta_ms {
            log::warn!(
                "Frame delta {:.1} ms clamped to {:.1} ms",
                delta,
                self.max_delta_ms
            );
            delta = self.max_delta_ms;
        }
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.step_ms {
            if self.max_substeps.is_some_and(|cap| steps >= cap) {
                // Drop the backlog rather than spiral
                log::warn!(
                    "Substep cap reached, dropping {:.1} ms of backlog",
                    self.accumulator
                );
                self.accumulator %= self.step_ms;
                break;
            }
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.step_ms).clamp(0.0, 1.0)
    }

    /// Forget the accumulator and the last timestamp
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}
