use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::config::EngineConfig;
use crate::queue::InstructionQueue;
use crate::spatial::playfield::StepStats;
use crate::systems::color::ColorPicker;

use super::perf_stats::PerfStats;
use super::WorldCore;

/// `config` must already be validated.
pub(super) fn create_world_core(config: EngineConfig) -> WorldCore {
    WorldCore {
        colors: config.colors(),
        picker: ColorPicker::new(&config.weights()),
        queue: InstructionQueue::new(config.queue_capacity),
        // Created by the first resize
        playfield: None,
        renderer: None,
        rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        config,

        stats: StepStats::default(),
        generation: 0,
        instructions_executed: 0,

        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}
