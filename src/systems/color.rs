//! Weighted colour sampling for newborn cells.

use rand::Rng;

use crate::domain::error::EngineError;
use crate::spatial::playfield::Color;

/// Prefix sums of the normalised palette weights.
#[derive(Clone, Debug)]
pub struct ColorPicker {
    cumulative: Vec<f64>,
}

impl ColorPicker {
    /// `weights` must already be validated (non-empty, finite, positive).
    pub fn new(weights: &[f64]) -> Self {
        let total: f64 = weights.iter().sum();
        let mut acc = 0.0;
        let mut cumulative: Vec<f64> = weights
            .iter()
            .map(|w| {
                acc += w / total;
                acc
            })
            .collect();
        // Rounding can leave the last bucket just under 1.0.
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
        Self { cumulative }
    }

    /// Number of live colours `K`.
    pub(crate) fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Map a uniform draw in `[0, 1)` to a colour in `1..=K`.
    pub fn pick(&self, draw: f64) -> Result<Color, EngineError> {
        self.cumulative
            .iter()
            .position(|&c| c > draw)
            .map(|i| (i + 1) as Color)
            .ok_or(EngineError::ColorSamplingExhausted { draw })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Color, EngineError> {
        self.pick(rng.gen::<f64>())
    }
}
