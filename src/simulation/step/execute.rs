use crate::domain::error::EngineError;
use crate::queue::{CompactionReport, Instruction, Opcode};
use crate::spatial::playfield::Playfield;

use super::render::GridSnapshot;
use super::{PerfTimer, WorldCore};

type PlotHook<'h> = dyn for<'s> FnMut(&GridSnapshot<'s>) + 'h;

pub(super) fn compact(world: &mut WorldCore) -> Result<CompactionReport, EngineError> {
    let timer = PerfTimer::start_if(world.perf_enabled);
    let report = world.queue.compact()?;
    if let Some(t) = timer {
        world.perf_stats.compact_ms = t.elapsed_ms();
    }
    Ok(report)
}

/// Run every queued command. Resizes are applied first, in queue order.
///
/// A corrupted instruction aborts the run and leaves `head` on it, so the
/// queue stays poisoned (every later call fails the same way) until
/// `WorldCore::discard_queue` drops it. Resizes found before the corruption
/// have already been applied.
pub(super) fn execute(
    world: &mut WorldCore,
    before_plot: &mut PlotHook<'_>,
    after_plot: &mut PlotHook<'_>,
) -> Result<(), EngineError> {
    let timer = PerfTimer::start_if(world.perf_enabled);

    // Grid size must be settled before anything reads width/height.
    resolve_resizes(world)?;

    loop {
        let pos = world.queue.head();
        if pos >= world.queue.latest_instruction() {
            break;
        }
        let (instruction, span) = world.queue.instruction_at(pos)?;
        dispatch(world, instruction, before_plot, after_plot)?;
        world.queue.advance_head(pos + span);
    }

    if let Some(t) = timer {
        world.perf_stats.execute_ms = t.elapsed_ms();
    }
    let mut perf = std::mem::take(&mut world.perf_stats);
    perf.record_counters(world);
    world.perf_stats = perf;
    Ok(())
}

/// Apply every pending resize in queue order, turning each into a skip.
fn resolve_resizes(world: &mut WorldCore) -> Result<(), EngineError> {
    let mut pos = world.queue.head();
    while pos < world.queue.latest_instruction() {
        let header = world.queue.header_at(pos)?;
        if header.opcode(pos)? == Opcode::GridResize {
            if let (Instruction::GridResize { width, height }, _) = world.queue.instruction_at(pos)? {
                resize_grid(world, width, height);
                world.instructions_executed += 1;
            }
            world.queue.mark_skip(pos)?;
        }
        pos += header.span();
    }
    Ok(())
}

fn dispatch(
    world: &mut WorldCore,
    instruction: Instruction,
    before_plot: &mut PlotHook<'_>,
    after_plot: &mut PlotHook<'_>,
) -> Result<(), EngineError> {
    match instruction {
        Instruction::Skip { .. } => return Ok(()),
        Instruction::GridResize { width, height } => {
            resize_grid(world, width, height);
        }
        Instruction::ClearCanvas => clear_canvas(world),
        Instruction::Seed { percent } => seed(world, percent)?,
        Instruction::NextTick => next_tick(world)?,
        Instruction::PlotUpdates => plot_updates(world, before_plot, after_plot),
    }
    world.instructions_executed += 1;
    Ok(())
}

/// Returns the previous grid area. A zero dimension, or an area that
/// overflows `usize` or exceeds `max_grid_area`, leaves everything as is.
fn resize_grid(world: &mut WorldCore, width: u32, height: u32) -> usize {
    let area = (width as usize).checked_mul(height as usize);
    if !matches!(area, Some(a) if a > 0 && a <= world.config.max_grid_area) {
        tracing::debug!(width, height, max = world.config.max_grid_area, "ignoring resize");
        return 0;
    }
    let previous = world.playfield.as_ref().map_or(0, |f| f.area());
    world.playfield = Some(Playfield::resized(world.playfield.as_ref(), width, height));
    tracing::debug!(width, height, previous, "grid resized");
    previous
}

fn clear_canvas(world: &mut WorldCore) {
    if let Some(field) = world.playfield.as_mut() {
        let removed = field.clear();
        tracing::debug!(removed, "grid cleared");
    }
    world.stats = Default::default();
    world.generation = 0;
    if let Some(renderer) = world.renderer.as_mut() {
        renderer.clear();
    }
}

fn seed(world: &mut WorldCore, percent: f32) -> Result<(), EngineError> {
    let Some(field) = world.playfield.as_mut() else {
        tracing::warn!(percent, "seed requested before any grid exists");
        return Ok(());
    };
    let placed = field.seed(percent, &world.picker, &mut world.rng)?;
    world.stats = Default::default();
    tracing::debug!(percent, placed, "grid seeded");
    Ok(())
}

fn next_tick(world: &mut WorldCore) -> Result<(), EngineError> {
    let Some(field) = world.playfield.as_mut() else {
        tracing::warn!("tick requested before any grid exists");
        return Ok(());
    };
    let timer = PerfTimer::start_if(world.perf_enabled);
    let before = field.population();
    world.stats = field.step(&world.picker, &mut world.rng)?;
    world.generation += 1;
    if let Some(t) = timer {
        world.perf_stats.step_ms = t.elapsed_ms();
    }
    tracing::trace!(
        generation = world.generation,
        before,
        after = field.population(),
        birth = world.stats.birth,
        died = world.stats.died,
        "tick"
    );
    Ok(())
}

fn plot_updates(world: &mut WorldCore, before_plot: &mut PlotHook<'_>, after_plot: &mut PlotHook<'_>) {
    let timer = PerfTimer::start_if(world.perf_enabled);
    let mut renderer = world.renderer.take();
    {
        let snapshot = super::render::snapshot(world);
        before_plot(&snapshot);
        if let Some(r) = renderer.as_mut() {
            r.plot_the_updates(&snapshot);
        }
        after_plot(&snapshot);
    }
    world.renderer = renderer;
    if let Some(field) = world.playfield.as_mut() {
        field.clear_updates();
    }
    if let Some(t) = timer {
        world.perf_stats.plot_ms = t.elapsed_ms();
    }
}
