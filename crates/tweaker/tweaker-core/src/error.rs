//! Error types for the tweaker core.
//!
//! Only loading and saving can fail. The clock, the keyframe store and the
//! interpolators are total over their inputs.

use serde::{Deserialize, Serialize};

/// Failures surfaced by persistence operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweakerError {
    /// The document is not valid JSON or does not match the tweak schema.
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// A variable entry has no `steps` section.
    #[error("steps section not found for variable '{variable}'")]
    MissingSteps { variable: String },

    /// Reading or writing the backing file failed.
    #[error("IO error on '{path}': {reason}")]
    Io { path: String, reason: String },
}

impl TweakerError {
    /// Check if the engine can keep running on defaults after this error.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Get error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Serialization { .. } => "serialization",
            Self::MissingSteps { .. } => "data",
            Self::Io { .. } => "io",
        }
    }
}

impl From<serde_json::Error> for TweakerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
