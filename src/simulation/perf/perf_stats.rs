use wasm_bindgen::prelude::*;

use super::WorldCore;

/// Timings (only while perf metrics are enabled) and engine counters.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) compact_ms: f64,
    pub(super) execute_ms: f64,
    pub(super) step_ms: f64,
    pub(super) plot_ms: f64,
    pub(super) survive: u32,
    pub(super) died: u32,
    pub(super) birth: u32,
    pub(super) checked: u32,
    pub(super) population: u32,
    pub(super) generation: u64,
    pub(super) queue_depth: u32,
    pub(super) requests_dropped: u32,
    pub(super) instructions_executed: u32,
}

impl PerfStats {
    pub(crate) fn reset_timings(&mut self) {
        self.compact_ms = 0.0;
        self.execute_ms = 0.0;
        self.step_ms = 0.0;
        self.plot_ms = 0.0;
    }

    pub(crate) fn record_counters(&mut self, world: &WorldCore) {
        let stats = world.stats;
        self.survive = stats.survive;
        self.died = stats.died;
        self.birth = stats.birth;
        self.checked = stats.checked;
        self.population = world.population() as u32;
        self.generation = world.generation;
        self.queue_depth = world.queue.depth() as u32;
        self.requests_dropped = world.queue.dropped();
        self.instructions_executed = world.instructions_executed.min(u32::MAX as u64) as u32;
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn compact_ms(&self) -> f64 { self.compact_ms }
    #[wasm_bindgen(getter)]
    pub fn execute_ms(&self) -> f64 { self.execute_ms }
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn plot_ms(&self) -> f64 { self.plot_ms }
    #[wasm_bindgen(getter)]
    pub fn survive(&self) -> u32 { self.survive }
    #[wasm_bindgen(getter)]
    pub fn died(&self) -> u32 { self.died }
    #[wasm_bindgen(getter)]
    pub fn birth(&self) -> u32 { self.birth }
    #[wasm_bindgen(getter)]
    pub fn checked(&self) -> u32 { self.checked }
    #[wasm_bindgen(getter)]
    pub fn population(&self) -> u32 { self.population }
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u64 { self.generation }
    #[wasm_bindgen(getter)]
    pub fn queue_depth(&self) -> u32 { self.queue_depth }
    #[wasm_bindgen(getter)]
    pub fn requests_dropped(&self) -> u32 { self.requests_dropped }
    #[wasm_bindgen(getter)]
    pub fn instructions_executed(&self) -> u32 { self.instructions_executed }
}
