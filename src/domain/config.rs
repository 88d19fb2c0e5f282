use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Largest palette a `u8` cell can hold with `0` as dead and the two values
/// above `K` kept free.
pub const MAX_PALETTE_LEN: usize = 253;

/// Words taken by the widest instruction (header + width + height).
pub const MIN_QUEUE_CAPACITY: usize = 3;

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;
/// 4096 x 4096 cells.
pub const DEFAULT_MAX_GRID_AREA: usize = 1 << 24;
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_1CE5;

/// One palette slot. `color` is packed ABGR (little-endian canvas order).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: u32,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Instruction queue size in words. Fixed for the engine's lifetime.
    pub queue_capacity: usize,
    /// Live colours `1..=K`, in palette order.
    pub palette: Vec<PaletteEntry>,
    pub rng_seed: u64,
    /// Largest `width * height` a resize may request; bigger ones are ignored.
    pub max_grid_area: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            palette: default_palette(),
            rng_seed: DEFAULT_RNG_SEED,
            max_grid_area: DEFAULT_MAX_GRID_AREA,
        }
    }
}

fn default_palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry { color: 0xFF50C878, weight: 0.55 }, // green
        PaletteEntry { color: 0xFFF0B428, weight: 0.25 }, // blue
        PaletteEntry { color: 0xFF3CA0FF, weight: 0.15 }, // orange
        PaletteEntry { color: 0xFF4040E0, weight: 0.05 }, // red
    ]
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.queue_capacity < MIN_QUEUE_CAPACITY {
            return Err(EngineError::InvalidConfig(format!(
                "queue_capacity {} is below the minimum of {}",
                self.queue_capacity, MIN_QUEUE_CAPACITY
            )));
        }
        if self.max_grid_area == 0 {
            return Err(EngineError::InvalidConfig("max_grid_area must be positive".to_string()));
        }
        if self.palette.is_empty() {
            return Err(EngineError::InvalidConfig("palette is empty".to_string()));
        }
        if self.palette.len() > MAX_PALETTE_LEN {
            return Err(EngineError::InvalidConfig(format!(
                "palette has {} entries, at most {} are supported",
                self.palette.len(),
                MAX_PALETTE_LEN
            )));
        }
        for (i, entry) in self.palette.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "palette entry {} has weight {}, expected a positive number",
                    i, entry.weight
                )));
            }
        }
        Ok(())
    }

    pub fn colors(&self) -> Vec<u32> {
        self.palette.iter().map(|p| p.color).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.palette.iter().map(|p| p.weight).collect()
    }
}
