//! Observers of engine lifecycle and update events.
//!
//! A [`StepListener`] is a set of four independent callback slots. Unset
//! slots are no-ops, so a listener only pays for the hooks it cares about.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::TimeSnapshot;

/// Callback signature shared by every hook.
pub type StepCallback = Box<dyn FnMut(&TimeSnapshot) + Send>;

/// Handle returned by [`Tweaker::add_listener`](crate::Tweaker::add_listener).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Discrete signals the engine emits, in the order it emits them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TweakerEvent {
    Updated(TimeSnapshot),
    Restarted(TimeSnapshot),
    Paused(TimeSnapshot),
    Playing(TimeSnapshot),
}

impl TweakerEvent {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Updated(_) => "updated",
            Self::Restarted(_) => "restarted",
            Self::Paused(_) => "paused",
            Self::Playing(_) => "playing",
        }
    }

    #[inline]
    pub fn time(&self) -> &TimeSnapshot {
        match self {
            Self::Updated(t) | Self::Restarted(t) | Self::Paused(t) | Self::Playing(t) => t,
        }
    }
}

#[derive(Default)]
pub struct StepListener {
    on_update: Option<StepCallback>,
    on_restarted: Option<StepCallback>,
    on_paused: Option<StepCallback>,
    on_playing: Option<StepCallback>,
}

impl fmt::Debug for StepListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepListener")
            .field("on_update", &self.on_update.is_some())
            .field("on_restarted", &self.on_restarted.is_some())
            .field("on_paused", &self.on_paused.is_some())
            .field("on_playing", &self.on_playing.is_some())
            .finish()
    }
}

impl StepListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every [`Tweaker::update`](crate::Tweaker::update).
    pub fn on_update(mut self, f: impl FnMut(&TimeSnapshot) + Send + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_restarted(mut self, f: impl FnMut(&TimeSnapshot) + Send + 'static) -> Self {
        self.on_restarted = Some(Box::new(f));
        self
    }

    pub fn on_paused(mut self, f: impl FnMut(&TimeSnapshot) + Send + 'static) -> Self {
        self.on_paused = Some(Box::new(f));
        self
    }

    pub fn on_playing(mut self, f: impl FnMut(&TimeSnapshot) + Send + 'static) -> Self {
        self.on_playing = Some(Box::new(f));
        self
    }

    /// Route an event to the matching slot, if set.
    pub fn notify(&mut self, event: &TweakerEvent) {
        let slot = match event {
            TweakerEvent::Updated(_) => &mut self.on_update,
            TweakerEvent::Restarted(_) => &mut self.on_restarted,
            TweakerEvent::Paused(_) => &mut self.on_paused,
            TweakerEvent::Playing(_) => &mut self.on_playing,
        };
        if let Some(cb) = slot.as_mut() {
            cb(event.time());
        }
    }

    /// Listener that routes every event through a single closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(&TweakerEvent) + Send + Clone + 'static,
    {
        let mut on_update = f.clone();
        let mut on_restarted = f.clone();
        let mut on_paused = f.clone();
        let mut on_playing = f;
        Self::new()
            .on_update(move |t| on_update(&TweakerEvent::Updated(*t)))
            .on_restarted(move |t| on_restarted(&TweakerEvent::Restarted(*t)))
            .on_paused(move |t| on_paused(&TweakerEvent::Paused(*t)))
            .on_playing(move |t| on_playing(&TweakerEvent::Playing(*t)))
    }
}
