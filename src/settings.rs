//! Loop and presentation settings
//!
//! Kept apart from `Tuning`: these change how the game is driven and shown,
//! never what happens inside a step.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FIXED_STEP_MS, MAX_FRAME_DELTA_MS};
use crate::error::ConfigError;

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Loop ===
    /// Simulation steps per second
    pub tick_rate_hz: f64,
    /// Frame deltas above this are clamped before reaching the accumulator
    pub max_frame_delta_ms: f64,
    /// Optional cap on steps per frame
    pub max_substeps: Option<u32>,
    /// Run seed; `None` picks one from the wall clock
    pub seed: Option<u64>,

    // === Text renderer ===
    pub columns: usize,
    pub rows: usize,
    /// Draw the health/score line under the playfield
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 1000.0 / FIXED_STEP_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            max_substeps: None,
            seed: None,

            columns: 80,
            rows: 24,
            show_hud: true,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) settings document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load a settings file from disk
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_config(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::Invalid(
                "tick_rate_hz must be positive".to_string(),
            ));
        }
        if self.max_frame_delta_ms < self.step_ms() {
            return Err(ConfigError::Invalid(
                "max_frame_delta_ms must cover at least one step".to_string(),
            ));
        }
        if self.max_substeps == Some(0) {
            return Err(ConfigError::Invalid(
                "max_substeps must allow at least one step".to_string(),
            ));
        }
        if self.columns < 4 || self.rows < 4 {
            return Err(ConfigError::Invalid(
                "text grid must be at least 4x4".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of one simulation step in milliseconds
    pub fn step_ms(&self) -> f64 {
        1000.0 / self.tick_rate_hz
    }
}

pub(crate) fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
