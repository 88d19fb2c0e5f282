use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::perf_stats::PerfStats;
use super::WorldCore;

pub(super) fn enable_perf_metrics(world: &mut WorldCore, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset_timings();
    }
}

pub(super) fn get_perf_stats(world: &WorldCore) -> PerfStats {
    let mut stats = world.perf_stats.clone();
    stats.record_counters(world);
    stats
}

pub(super) fn set_rng_seed(world: &mut WorldCore, seed: u64) {
    world.config.rng_seed = seed;
    world.rng = ChaCha8Rng::seed_from_u64(seed);
}
