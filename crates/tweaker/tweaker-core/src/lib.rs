//! Tweaker Core
//!
//! Drives named numeric variables through time with keyframe interpolation,
//! for parameterizing real-time visual demos. A controllable clock
//! (pause/resume/seek/speed) is stepped once per frame, and every variable
//! resamples its sparse keyframes at the resulting step position.
//!
//! Editors and file dialogs live outside this crate; they talk to the engine
//! through [`Tweaker`] and the JSON string transforms.

pub mod config;
pub mod engine;
pub mod error;
pub mod interp;
pub mod keyframes;
pub mod listener;
pub mod stored_tweaks;
pub mod time;
pub mod variable;

// Re-exports for consumers (editors, players)
pub use config::TweakerConfig;
pub use engine::Tweaker;
pub use error::TweakerError;
pub use interp::Interpolator;
pub use keyframes::KeyframeStore;
pub use listener::{ListenerId, StepListener, TweakerEvent};
pub use stored_tweaks::{parse_stored_tweaks_json, write_stored_tweaks_json, LoadedTweaks};
pub use time::{ControllableTime, ManualTimeSource, SystemTimeSource, TimeSnapshot, TimeSource};
pub use variable::Variable;

/// Tweaker result type
pub type Result<T> = core::result::Result<T, TweakerError>;
