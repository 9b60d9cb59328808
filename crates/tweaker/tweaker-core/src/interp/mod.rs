//! Interpolation strategies for resampling keyframes.
//!
//! The strategy is a closed enum. Its string names only matter at the
//! persistence boundary, see [`Interpolator::name`] and [`Interpolator::from_name`].

pub mod functions;

use serde::{Deserialize, Serialize};

use functions::{blend_factor, cosine_ease, lerp_f64, pow_ease};

/// Exponent used by [`Interpolator::Pow`] when none is given.
pub const DEFAULT_POW_EXPONENT: f64 = 2.0;

const COSINE_NAME: &str = "CosineInterpolator";
const LINEAR_NAME: &str = "LinearInterpolator";
const POW_NAME: &str = "PowInterpolator";

/// How a value is computed between two bracketing keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Interpolator {
    Linear,
    /// Cosine ease in and out.
    #[default]
    Cosine,
    /// Blend factor raised to `exponent`.
    Pow { exponent: f64 },
}

impl Interpolator {
    /// Power curve with the default exponent.
    pub fn pow() -> Self {
        Self::Pow {
            exponent: DEFAULT_POW_EXPONENT,
        }
    }

    /// Interpolate the value at `position` between keyframes at `left_pos` and `right_pos`.
    ///
    /// Exact at both keyframe positions. Positions outside the interval extrapolate
    /// along the variant's curve.
    pub fn interpolate(
        &self,
        position: f64,
        left_pos: f64,
        right_pos: f64,
        left_value: f64,
        right_value: f64,
    ) -> f64 {
        if position == left_pos || left_pos == right_pos {
            return left_value;
        }
        if position == right_pos {
            return right_value;
        }

        let t = blend_factor(position, left_pos, right_pos);
        let eased = match *self {
            Self::Linear => t,
            Self::Cosine => cosine_ease(t),
            Self::Pow { exponent } => pow_ease(t, exponent),
        };
        lerp_f64(left_value, right_value, eased)
    }

    /// Stable name written to tweak files.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => LINEAR_NAME,
            Self::Cosine => COSINE_NAME,
            Self::Pow { .. } => POW_NAME,
        }
    }

    /// Resolve a persisted name. Unknown names fall back to cosine.
    pub fn from_name(name: &str, exponent: Option<f64>) -> Self {
        match name {
            LINEAR_NAME => Self::Linear,
            POW_NAME => Self::Pow {
                exponent: exponent.unwrap_or(DEFAULT_POW_EXPONENT),
            },
            COSINE_NAME => Self::Cosine,
            other => {
                log::debug!("unknown interpolator '{other}', using {COSINE_NAME}");
                Self::Cosine
            }
        }
    }

    /// Exponent of the power curve, if this is one.
    #[inline]
    pub fn exponent(&self) -> Option<f64> {
        match self {
            Self::Pow { exponent } => Some(*exponent),
            _ => None,
        }
    }
}
