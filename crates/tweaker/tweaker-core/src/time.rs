/**
 * Demo time that can be paused, resumed, restarted, speed scaled and stepped.
 * Wall time comes from a pluggable millisecond source so that hosts
 * (and tests) can replace the system clock.
 */
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::TweakerConfig;

/// Monotonic wall-clock reading in milliseconds.
pub trait TimeSource: Send {
    fn now_millis(&self) -> u64;
}

/// System monotonic clock. Works natively and in the browser.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: instant::Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    #[inline]
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock. Clones share the same reading, so a host can keep one
/// handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    millis: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_millis(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn advance_seconds(&self, seconds: f64) {
        self.advance_millis((seconds * 1000.0).round() as u64);
    }

    /// Jump to an absolute reading, backwards included.
    pub fn set_millis(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    #[inline]
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Read-only view of the clock, handed to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TimeSnapshot {
    pub seconds_since_start: f64,
    pub step_count: u64,
    /// Signed length of the last step.
    pub step_duration_seconds: f64,
    pub paused: bool,
    pub speed_factor: f64,
}

/// Steppable demo clock.
///
/// No input is rejected: negative time changes and zero or negative speed
/// factors are all accepted and simply produce negative or zero step durations.
pub struct ControllableTime {
    source: Box<dyn TimeSource>,
    speed_factor: f64,

    seconds_since_start: f64,
    step_count: u64,
    step_duration_seconds: f64,

    prev_millis: u64,
    current_elapsed_seconds: f64,
    paused: bool,
    resuming: bool,
    last_step_timestamp: f64,
}

impl fmt::Debug for ControllableTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllableTime")
            .field("speed_factor", &self.speed_factor)
            .field("seconds_since_start", &self.seconds_since_start)
            .field("step_count", &self.step_count)
            .field("step_duration_seconds", &self.step_duration_seconds)
            .field("current_elapsed_seconds", &self.current_elapsed_seconds)
            .field("paused", &self.paused)
            .field("resuming", &self.resuming)
            .finish_non_exhaustive()
    }
}

impl Default for ControllableTime {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllableTime {
    /// Running clock on system time.
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource::new())
    }

    /// Running clock on a custom wall-clock source.
    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        let now = source.now_millis();
        Self {
            source: Box::new(source),
            speed_factor: 1.0,
            seconds_since_start: 0.0,
            step_count: 0,
            step_duration_seconds: 0.0,
            prev_millis: now,
            current_elapsed_seconds: 0.0,
            paused: false,
            resuming: false,
            last_step_timestamp: 0.0,
        }
    }

    /// Clock with the pause state and speed factor taken from `cfg`.
    pub fn from_config(cfg: &TweakerConfig, source: impl TimeSource + 'static) -> Self {
        let mut time = Self::with_source(source);
        time.paused = cfg.start_paused;
        time.speed_factor = cfg.speed_factor;
        time
    }

    /// Back to zero, anchored at the current wall time. Pause state is kept.
    pub fn reset(&mut self) {
        self.resuming = false;
        self.seconds_since_start = 0.0;
        self.step_count = 0;
        self.step_duration_seconds = 0.0;
        self.current_elapsed_seconds = 0.0;
        self.last_step_timestamp = 0.0;
        self.prev_millis = self.source.now_millis();
    }

    /// Pausing folds the running time up to now into the elapsed total, so
    /// the frozen value includes it.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            if paused {
                self.current_time_seconds();
            }
            self.paused = paused;
            self.resuming = !paused;
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Shift demo time by `delta_seconds`, in either direction.
    pub fn change_time(&mut self, delta_seconds: f64) {
        self.current_elapsed_seconds += delta_seconds;
    }

    #[inline]
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        self.speed_factor = speed_factor;
    }

    /// Demo time as of now.
    ///
    /// Not pure: while running, the wall time since the previous query is scaled
    /// by the speed factor and accumulated, and every call records the query time.
    /// The first query after a resume only re-anchors, so the paused gap is skipped.
    pub fn current_time_seconds(&mut self) -> f64 {
        let current_millis = self.source.now_millis();

        if !self.paused {
            if self.resuming {
                self.resuming = false;
            } else {
                let since_last_query_s = (current_millis as f64 - self.prev_millis as f64) / 1000.0;
                self.current_elapsed_seconds += since_last_query_s * self.speed_factor;
            }
        }

        self.prev_millis = current_millis;
        self.current_elapsed_seconds
    }

    /// Advance one step. The step duration may be negative.
    pub fn next_step(&mut self) {
        let time = self.current_time_seconds();
        self.step_count += 1;
        self.step_duration_seconds = time - self.last_step_timestamp;
        self.seconds_since_start += self.step_duration_seconds;
        self.last_step_timestamp = time;
    }

    #[inline]
    pub fn seconds_since_start(&self) -> f64 {
        self.seconds_since_start
    }

    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    #[inline]
    pub fn step_duration_seconds(&self) -> f64 {
        self.step_duration_seconds
    }

    pub fn snapshot(&self) -> TimeSnapshot {
        TimeSnapshot {
            seconds_since_start: self.seconds_since_start,
            step_count: self.step_count,
            step_duration_seconds: self.step_duration_seconds,
            paused: self.paused,
            speed_factor: self.speed_factor,
        }
    }
}
