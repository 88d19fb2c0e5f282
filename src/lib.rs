//! Lifequeue Engine - deferred-command Game of Life in WASM
//!
//! Architecture:
//! - core/       - low-level helpers (checked-in-debug indexing)
//! - domain/     - config and error types
//! - queue/      - opcode codec, instruction queue, compaction
//! - spatial/    - playfield: dense grid + sparse live-cell index
//! - systems/    - colour sampling
//! - simulation/ - WorldCore orchestration and the JS facade

// Must be first so `fast!` is in scope for the modules below
#[macro_use]
pub mod core;
pub mod domain;
pub mod queue;
pub mod spatial;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

#[cfg(feature = "parallel")]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"Lifequeue WASM engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub use domain::config::{EngineConfig, PaletteEntry};
pub use domain::error::EngineError;
pub use queue::{Instruction, InstructionQueue, Opcode};
pub use simulation::{GridSnapshot, PerfStats, Renderer, World, WorldCore};
pub use spatial::playfield::{Color, LiveCell, Playfield, StepStats, DEAD};
