//! Engine: owns the clock and the variables, advances them once per tick.
//!
//! Methods:
//! - new/with_time/open, variable/value, update, start/play/pause/play_pause
//! - listeners (add/remove, notified in registration order)
//! - save_to_string/load_from_string and the file-backed save/load

use std::fs;
use std::io;

use indexmap::IndexMap;

use crate::config::TweakerConfig;
use crate::error::TweakerError;
use crate::listener::{ListenerId, StepListener, TweakerEvent};
use crate::stored_tweaks::{parse_stored_tweaks_json, write_stored_tweaks_json};
use crate::time::{ControllableTime, SystemTimeSource, TimeSource};
use crate::variable::Variable;
use crate::Result;

/// Handles several [`Variable`]s and controls the time stepping.
///
/// Single-threaded by contract: a host that drives the engine from one thread
/// and reads it from another shares it as `Arc<Mutex<Tweaker>>`.
#[derive(Debug)]
pub struct Tweaker {
    file_name: String,
    duration_seconds: f64,
    steps_per_second: f64,

    varyings: IndexMap<String, Variable>,
    time: ControllableTime,

    listeners: IndexMap<ListenerId, StepListener>,
    next_listener: u64,
}

impl Default for Tweaker {
    fn default() -> Self {
        Self::new(TweakerConfig::default())
    }
}

impl Tweaker {
    /// Create an engine on system time. Does not touch the file system.
    pub fn new(cfg: TweakerConfig) -> Self {
        Self::with_time_source(cfg, SystemTimeSource::new())
    }

    /// Create an engine whose clock reads wall time from `source`.
    pub fn with_time_source(cfg: TweakerConfig, source: impl TimeSource + 'static) -> Self {
        let time = ControllableTime::from_config(&cfg, source);
        Self::with_time(cfg, time)
    }

    /// Create an engine around an existing clock. The clock keeps its own pause
    /// state and speed factor.
    pub fn with_time(cfg: TweakerConfig, time: ControllableTime) -> Self {
        Self {
            file_name: cfg.file_name,
            duration_seconds: cfg.duration_seconds,
            steps_per_second: cfg.steps_per_second,
            varyings: IndexMap::new(),
            time,
            listeners: IndexMap::new(),
            next_listener: 0,
        }
    }

    /// Create an engine and try to load its configured file.
    ///
    /// A file that cannot be read is logged and the engine starts empty. A file
    /// that can be read but not parsed is an error.
    pub fn open(cfg: TweakerConfig) -> Result<Self> {
        let mut tweaker = Self::new(cfg);
        tweaker.load_or_keep_defaults()?;
        Ok(tweaker)
    }

    /// Like [`open`](Self::open) with a custom wall-clock source.
    pub fn open_with_time_source(
        cfg: TweakerConfig,
        source: impl TimeSource + 'static,
    ) -> Result<Self> {
        let mut tweaker = Self::with_time_source(cfg, source);
        tweaker.load_or_keep_defaults()?;
        Ok(tweaker)
    }

    fn load_or_keep_defaults(&mut self) -> Result<()> {
        match self.load() {
            Err(err) if err.is_recoverable() => {
                log::warn!("could not load tweaker datafile, creating new: {err}");
                Ok(())
            }
            other => other,
        }
    }

    // ----- variables -----

    /// Get the variable called `name`, creating it with `default_value` if absent.
    /// The first call decides the default.
    pub fn variable(&mut self, name: &str, default_value: f64) -> &mut Variable {
        if !self.varyings.contains_key(name) {
            log::debug!("creating variable '{name}' (default {default_value})");
        }
        self.varyings
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name, default_value))
    }

    /// Current value of the variable called `name`, creating it if absent.
    pub fn value(&mut self, name: &str, default_value: f64) -> f64 {
        self.variable(name, default_value).value()
    }

    /// Variables in creation (or file) order.
    #[inline]
    pub fn varyings(&self) -> &IndexMap<String, Variable> {
        &self.varyings
    }

    #[inline]
    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.varyings.get(name)
    }

    // ----- time -----

    #[inline]
    pub fn time(&self) -> &ControllableTime {
        &self.time
    }

    /// Direct clock access. Changes made here emit no listener events.
    #[inline]
    pub fn time_mut(&mut self) -> &mut ControllableTime {
        &mut self.time
    }

    /// Number of grid steps over the whole duration, both ends included.
    pub fn steps(&self) -> i64 {
        (self.duration_seconds * self.steps_per_second).floor() as i64 + 1
    }

    /// Fractional step position of the clock after the last update.
    #[inline]
    pub fn step_position(&self) -> f64 {
        self.time.seconds_since_start() * self.steps_per_second
    }

    /// Grid step the clock is currently in.
    #[inline]
    pub fn current_step(&self) -> i64 {
        self.step_position().floor() as i64
    }

    /// Move demo time by `delta_seconds` (negative to rewind).
    pub fn seek(&mut self, delta_seconds: f64) {
        self.time.change_time(delta_seconds);
    }

    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        self.time.set_speed_factor(speed_factor);
    }

    /// Call once per frame: step the clock, resample every variable, notify listeners.
    pub fn update(&mut self) {
        self.time.next_step();

        let position = self.step_position();
        for varying in self.varyings.values_mut() {
            varying.update(position);
        }

        self.notify(TweakerEvent::Updated(self.time.snapshot()));
    }

    /// Restart from zero and play.
    pub fn start(&mut self) {
        self.time.reset();
        self.time.set_paused(false);
        log::debug!("tweaker restarted");

        let snapshot = self.time.snapshot();
        self.notify(TweakerEvent::Restarted(snapshot));
        self.notify(TweakerEvent::Playing(snapshot));
    }

    pub fn play(&mut self) {
        self.time.set_paused(false);
        log::debug!("tweaker playing at {:.3}s", self.time.seconds_since_start());
        self.notify(TweakerEvent::Playing(self.time.snapshot()));
    }

    pub fn pause(&mut self) {
        self.time.set_paused(true);
        log::debug!("tweaker paused at {:.3}s", self.time.seconds_since_start());
        self.notify(TweakerEvent::Paused(self.time.snapshot()));
    }

    pub fn play_pause(&mut self) {
        if self.time.is_paused() {
            self.play();
        } else {
            self.pause();
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.time.is_paused()
    }

    // ----- listeners -----

    pub fn add_listener(&mut self, listener: StepListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.insert(id, listener);
        id
    }

    /// Detach a listener, handing it back. Unknown ids are ignored.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<StepListener> {
        self.listeners.shift_remove(&id)
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self, event: TweakerEvent) {
        for listener in self.listeners.values_mut() {
            listener.notify(&event);
        }
    }

    // ----- settings -----

    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    #[inline]
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn set_duration_seconds(&mut self, duration_seconds: f64) {
        self.duration_seconds = duration_seconds;
    }

    #[inline]
    pub fn steps_per_second(&self) -> f64 {
        self.steps_per_second
    }

    pub fn set_steps_per_second(&mut self, steps_per_second: f64) {
        self.steps_per_second = steps_per_second;
    }

    // ----- persistence -----

    /// Serialize settings and every variable.
    pub fn save_to_string(&self) -> Result<String> {
        write_stored_tweaks_json(
            self.steps_per_second,
            self.duration_seconds,
            self.varyings.values(),
        )
    }

    /// Replace settings and variables with the contents of `json`.
    ///
    /// The document is fully parsed first, so on error the engine is unchanged.
    pub fn load_from_string(&mut self, json: &str) -> Result<()> {
        let loaded = parse_stored_tweaks_json(json)?;

        self.steps_per_second = loaded.steps_per_second;
        self.duration_seconds = loaded.duration_seconds;
        self.varyings.clear();
        for variable in loaded.variables {
            self.varyings.insert(variable.name().to_string(), variable);
        }
        log::info!(
            "loaded {} variables ({} steps/s, {}s)",
            self.varyings.len(),
            self.steps_per_second,
            self.duration_seconds
        );
        Ok(())
    }

    /// Write [`save_to_string`](Self::save_to_string) to the configured file.
    pub fn save(&self) -> Result<()> {
        let text = self.save_to_string()?;
        fs::write(&self.file_name, text).map_err(|e| self.io_error(e))?;
        log::info!("saved tweaker datafile '{}'", self.file_name);
        Ok(())
    }

    /// Read the configured file through [`load_from_string`](Self::load_from_string).
    pub fn load(&mut self) -> Result<()> {
        let text = fs::read_to_string(&self.file_name).map_err(|e| self.io_error(e))?;
        self.load_from_string(&text)
    }

    fn io_error(&self, err: io::Error) -> TweakerError {
        TweakerError::Io {
            path: self.file_name.clone(),
            reason: err.to_string(),
        }
    }
}
