//! Construction parameters for a [`Tweaker`](crate::Tweaker).

use serde::{Deserialize, Serialize};

/// File used when no explicit path is configured.
pub const DEFAULT_FILE_NAME: &str = "demotweaker.json";
/// Timeline length of a freshly constructed engine.
pub const DEFAULT_DURATION_SECONDS: f64 = 3.0 * 60.0;
/// Keyframe grid resolution of a freshly constructed engine.
pub const DEFAULT_STEPS_PER_SECOND: f64 = 1.0;

/// Used when a loaded document omits `stepsPerSecond`.
pub const LOAD_FALLBACK_STEPS_PER_SECOND: f64 = 2.0;
/// Used when a loaded document omits `durationSeconds`.
pub const LOAD_FALLBACK_DURATION_SECONDS: f64 = 5.0 * 60.0;

/// Engine configuration. Serializable so hosts can keep it next to their own settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweakerConfig {
    /// Path used by `save`/`load`/`open`.
    pub file_name: String,
    pub duration_seconds: f64,
    /// Resolution of the keyframe grid.
    pub steps_per_second: f64,

    /// Initial pause state of the clock.
    pub start_paused: bool,
    /// Initial wall-time to demo-time multiplier. Zero and negative values are allowed.
    pub speed_factor: f64,
}

impl Default for TweakerConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            duration_seconds: DEFAULT_DURATION_SECONDS,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            start_paused: false,
            speed_factor: 1.0,
        }
    }
}

impl TweakerConfig {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_duration_seconds(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn with_steps_per_second(mut self, steps_per_second: f64) -> Self {
        self.steps_per_second = steps_per_second;
        self
    }

    pub fn paused(mut self, start_paused: bool) -> Self {
        self.start_paused = start_paused;
        self
    }

    pub fn with_speed_factor(mut self, speed_factor: f64) -> Self {
        self.speed_factor = speed_factor;
        self
    }
}
