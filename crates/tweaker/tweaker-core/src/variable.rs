//! A named value that varies over time.

use crate::interp::Interpolator;
use crate::keyframes::KeyframeStore;

/// Keyframes plus the strategy used to resample them, and the value computed
/// at the last update.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    default_value: f64,
    interpolator: Interpolator,
    steps: KeyframeStore,
    value: f64,
}

impl Variable {
    pub fn new(name: impl Into<String>, default_value: f64) -> Self {
        Self::with_interpolator(name, default_value, Interpolator::default())
    }

    pub fn with_interpolator(
        name: impl Into<String>,
        default_value: f64,
        interpolator: Interpolator,
    ) -> Self {
        Self {
            name: name.into(),
            default_value,
            interpolator,
            steps: KeyframeStore::new(),
            value: default_value,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Value computed by the most recent [`update`](Self::update).
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn steps(&self) -> &KeyframeStore {
        &self.steps
    }

    #[inline]
    pub fn interpolator(&self) -> Interpolator {
        self.interpolator
    }

    pub fn set_interpolator(&mut self, interpolator: Interpolator) {
        self.interpolator = interpolator;
    }

    pub fn set(&mut self, step: i32, value: f64) {
        self.steps.set(step, value);
    }

    #[inline]
    pub fn get(&self, step: i32) -> Option<f64> {
        self.steps.get(step)
    }

    #[inline]
    pub fn has_step(&self, step: i32) -> bool {
        self.steps.has(step)
    }

    pub fn clear_step(&mut self, step: i32) -> Option<f64> {
        self.steps.clear(step)
    }

    /// Resample at a fractional step position and cache the result.
    pub fn update(&mut self, position: f64) {
        self.value = self.sample(position);
    }

    /// Evaluate at a fractional step position without touching the cached value.
    ///
    /// The bracketing steps walk outward from `floor(position)` to the nearest
    /// keyframes, but never past the store's bounds. A side with no keyframe
    /// reads as the default value.
    pub fn sample(&self, position: f64) -> f64 {
        if self.steps.is_empty() {
            return self.default_value;
        }

        let min = self.steps.min_step();
        let max = self.steps.max_step();

        let mut prev_step = position.floor() as i32;
        let mut next_step = prev_step.saturating_add(1);

        if !self.steps.has(prev_step) && prev_step > min {
            prev_step = self.steps.floor_key(prev_step).unwrap_or(min);
        }
        if !self.steps.has(next_step) && next_step < max {
            next_step = self.steps.ceil_key(next_step).unwrap_or(max);
        }

        let prev_value = self.steps.get(prev_step).unwrap_or(self.default_value);
        let next_value = self.steps.get(next_step).unwrap_or(self.default_value);

        self.interpolator.interpolate(
            position,
            f64::from(prev_step),
            f64::from(next_step),
            prev_value,
            next_value,
        )
    }

    pub(crate) fn replace_steps(&mut self, steps: KeyframeStore) {
        self.steps = steps;
    }
}
