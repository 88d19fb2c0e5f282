use rand::Rng;

use crate::domain::error::EngineError;
use crate::systems::color::ColorPicker;

use super::{LiveCell, Playfield, DEAD};

/// Fraction of `area` random draws attempted -> expected fraction of cells
/// filled. Draws that hit an occupied cell are wasted, so the fill falls
/// behind the attempts (`1 - e^-k`).
pub const FILL_TABLE: [(f64, f64); 13] = [
    (0.05, 0.0488),
    (0.10, 0.0952),
    (0.15, 0.1393),
    (0.20, 0.1813),
    (0.25, 0.2212),
    (0.30, 0.2592),
    (0.40, 0.3297),
    (0.50, 0.3935),
    (0.60, 0.4512),
    (0.70, 0.5034),
    (0.80, 0.5507),
    (0.90, 0.5934),
    (1.00, 0.6321),
];

/// Expected filled fraction for `fraction` draws: the smallest table entry
/// whose key exceeds it, else the largest entry.
pub fn expected_fill(fraction: f64) -> f64 {
    FILL_TABLE
        .iter()
        .find(|(key, _)| *key > fraction)
        .unwrap_or(&FILL_TABLE[FILL_TABLE.len() - 1])
        .1
}

/// Canonical seed percent. Values `<= 1` are fractions, larger values are
/// already percent, so `1` means 100%.
pub fn normalize_percent(pct: f64) -> Result<f32, EngineError> {
    if !pct.is_finite() {
        return Err(EngineError::InvalidPercent(pct));
    }
    let percent = if pct <= 1.0 { pct * 100.0 } else { pct };
    if !(0.0..=100.0).contains(&percent) {
        return Err(EngineError::InvalidPercent(pct));
    }
    Ok(percent as f32)
}

impl Playfield {
    /// Replace the population with a random one at `percent` density.
    ///
    /// Cells alive before the call are reported as deaths in the change list,
    /// followed by one birth per placement. Returns the number placed.
    pub fn seed<R: Rng + ?Sized>(
        &mut self,
        percent: f32,
        picker: &ColorPicker,
        rng: &mut R,
    ) -> Result<usize, EngineError> {
        let fraction = (percent as f64 / 100.0).clamp(0.0, 1.0);
        let area = self.area();

        for cell in self.index.drain(..) {
            self.updates.push(LiveCell { color: DEAD as u32, ..cell });
        }
        self.cells.fill(DEAD);

        if area == 0 || fraction == 0.0 {
            return Ok(0);
        }

        // Rejection sampling never reaches full density; fill directly.
        if fraction >= 1.0 {
            self.index.reserve(area);
            self.updates.reserve(area);
            for y in 0..self.height {
                for x in 0..self.width {
                    let color = picker.sample(rng)?;
                    let i = self.offset(x, y);
                    self.cells[i] = color;
                    self.index.push(LiveCell::new(color, x, y));
                    self.updates.push(LiveCell::new(color, x, y));
                }
            }
            return Ok(area);
        }

        let target = ((expected_fill(fraction) * area as f64).ceil() as usize).min(area);
        let attempts = (fraction * area as f64).round() as usize;
        self.index.reserve(target);
        self.updates.reserve(target);

        let mut placed = 0;
        for _ in 0..attempts {
            if placed >= target {
                break;
            }
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            let i = self.offset(x, y);
            if self.cells[i] != DEAD {
                continue;
            }
            let color = picker.sample(rng)?;
            self.cells[i] = color;
            self.index.push(LiveCell::new(color, x, y));
            self.updates.push(LiveCell::new(color, x, y));
            placed += 1;
        }
        Ok(placed)
    }
}
