//! WorldCore - deferred-command Game of Life engine
//!
//! A UI enqueues high-level requests (resize, seed, clear, tick, plot) at
//! any time. Once per frame the driver calls `compact()` then `execute()`:
//! compaction drops superseded requests, execution settles the grid size
//! first and then runs the surviving commands in order.
//!
//! - commands/ - request_* enqueue operations and direct cell edits
//! - step/     - execution, dispatch and command handlers
//! - render/   - renderer contract and read-only snapshots
//! - perf/     - timing and counters
//! - init/     - construction and runtime settings

use rand_chacha::ChaCha8Rng;

use crate::domain::config::EngineConfig;
use crate::domain::error::EngineError;
use crate::queue::{CompactionReport, InstructionQueue};
use crate::spatial::playfield::{Color, Playfield, StepStats};
use crate::systems::color::ColorPicker;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/execute.rs"]
mod execute;
#[path = "render/render.rs"]
mod render;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::World;
pub use perf_stats::PerfStats;
pub use render::{GridSnapshot, Renderer};

use perf_timer::PerfTimer;

/// The engine: instruction queue, playfield and everything a frame needs.
pub struct WorldCore {
    config: EngineConfig,
    colors: Vec<u32>,
    picker: ColorPicker,
    queue: InstructionQueue,
    playfield: Option<Playfield>,
    renderer: Option<Box<dyn Renderer>>,
    rng: ChaCha8Rng,

    // State
    stats: StepStats,
    generation: u64,
    instructions_executed: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl WorldCore {
    /// Engine with the default palette and queue size.
    pub fn new() -> Self {
        init::create_world_core(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(init::create_world_core(config))
    }

    pub fn from_config_json(json: &str) -> Result<Self, EngineError> {
        Self::with_config(EngineConfig::from_json(json)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.playfield.as_ref().map_or(0, |f| f.width())
    }

    pub fn height(&self) -> u32 {
        self.playfield.as_ref().map_or(0, |f| f.height())
    }

    pub fn population(&self) -> usize {
        self.playfield.as_ref().map_or(0, |f| f.population())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> StepStats {
        self.stats
    }

    pub fn queue(&self) -> &InstructionQueue {
        &self.queue
    }

    pub fn queue_depth(&self) -> usize {
        self.queue.depth()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn playfield(&self) -> Option<&Playfield> {
        self.playfield.as_ref()
    }

    // === REQUESTS ===
    // Ok(false) means the queue was full even after compaction.

    pub fn request_resize(&mut self, width: u32, height: u32) -> Result<bool, EngineError> {
        commands::request_resize(self, width, height)
    }

    /// `percent <= 1` is a fraction, anything larger is already percent.
    pub fn request_seed(&mut self, percent: f64) -> Result<bool, EngineError> {
        commands::request_seed(self, percent)
    }

    pub fn request_clear(&mut self) -> Result<bool, EngineError> {
        commands::request_clear(self)
    }

    pub fn request_tick(&mut self) -> Result<bool, EngineError> {
        commands::request_tick(self)
    }

    pub fn request_plot(&mut self) -> Result<bool, EngineError> {
        commands::request_plot(self)
    }

    /// Paint one cell immediately, bypassing the queue.
    pub fn set_cell(&mut self, x: u32, y: u32, color: Color) -> bool {
        commands::set_cell(self, x, y, color)
    }

    // === FRAME ===

    pub fn compact(&mut self) -> Result<CompactionReport, EngineError> {
        execute::compact(self)
    }

    pub fn execute(&mut self) -> Result<(), EngineError> {
        execute::execute(self, &mut |_| {}, &mut |_| {})
    }

    /// Like `execute`, calling `before`/`after` around every plot.
    pub fn execute_with_hooks<B, A>(&mut self, mut before: B, mut after: A) -> Result<(), EngineError>
    where
        B: FnMut(&GridSnapshot<'_>),
        A: FnMut(&GridSnapshot<'_>),
    {
        execute::execute(self, &mut before, &mut after)
    }

    /// Drop every pending command, including a corrupted one that keeps
    /// `execute` failing. Returns the number of words discarded.
    pub fn discard_queue(&mut self) -> usize {
        let depth = self.queue.depth();
        self.queue.clear();
        tracing::debug!(depth, "instruction queue discarded");
        depth
    }

    /// `compact()` followed by `execute()`.
    pub fn run_frame(&mut self) -> Result<(), EngineError> {
        self.compact()?;
        self.execute()
    }

    // === RENDERING ===

    /// Replaces any renderer already attached.
    pub fn attach_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
    }

    pub fn detach_renderer(&mut self) -> Option<Box<dyn Renderer>> {
        self.renderer.take()
    }

    pub fn grid_snapshot(&self) -> GridSnapshot<'_> {
        render::snapshot(self)
    }

    // === SETTINGS ===

    /// Enable or disable timing collection (counters are always kept)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        settings::set_rng_seed(self, seed);
    }
}

impl Default for WorldCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
