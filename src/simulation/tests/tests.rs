use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::queue::{encode, Instruction, Opcode, Word};
use crate::spatial::playfield::{LiveCell, DEAD};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Plot { updates: usize, population: usize },
    Clear,
    Before,
    After,
}

struct RecordingRenderer {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Renderer for RecordingRenderer {
    fn plot_the_updates(&mut self, snapshot: &GridSnapshot<'_>) {
        self.events.borrow_mut().push(Event::Plot {
            updates: snapshot.updates.len(),
            population: snapshot.index.len(),
        });
    }

    fn clear(&mut self) {
        self.events.borrow_mut().push(Event::Clear);
    }
}

fn world_with_renderer() -> (WorldCore, Rc<RefCell<Vec<Event>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut world = WorldCore::new();
    world.attach_renderer(Box::new(RecordingRenderer { events: events.clone() }));
    (world, events)
}

#[test]
fn resize_then_full_seed_fills_grid() {
    let mut world = WorldCore::new();
    assert_eq!(world.request_resize(4, 4), Ok(true));
    world.compact().unwrap();
    world.execute().unwrap();
    assert_eq!((world.width(), world.height()), (4, 4));

    assert_eq!(world.request_seed(1.0), Ok(true));
    world.compact().unwrap();
    world.execute().unwrap();

    let snapshot = world.grid_snapshot();
    assert_eq!(snapshot.index.len(), 16);
    assert_eq!(crate::spatial::playfield::as_words(snapshot.index).len(), 48);
    assert!(snapshot.grid.iter().all(|&c| c != DEAD));
    assert_eq!(world.queue_depth(), 0);
}

#[test]
fn resizes_run_before_everything_else() {
    let mut world = WorldCore::new();
    // Seed is queued first but still sees the grid created by the resize.
    world.request_seed(100.0).unwrap();
    world.request_resize(3, 2).unwrap();
    world.run_frame().unwrap();

    assert_eq!(world.population(), 6);
}

#[test]
fn resize_after_clear_is_still_honoured() {
    let mut world = WorldCore::new();
    world.request_resize(5, 5).unwrap();
    world.run_frame().unwrap();
    world.set_cell(1, 1, 1);

    world.request_clear().unwrap();
    world.request_resize(8, 6).unwrap();
    world.run_frame().unwrap();

    assert_eq!((world.width(), world.height()), (8, 6));
    assert_eq!(world.population(), 0);
}

#[test]
fn zero_area_resize_is_a_noop() {
    let mut world = WorldCore::new();
    world.request_resize(0, 10).unwrap();
    world.run_frame().unwrap();
    assert!(world.playfield().is_none());

    world.request_resize(4, 4).unwrap();
    world.run_frame().unwrap();
    world.request_resize(4, 0).unwrap();
    world.run_frame().unwrap();
    assert_eq!((world.width(), world.height()), (4, 4));
}

#[test]
fn oversized_resize_is_ignored() {
    let config = EngineConfig {
        max_grid_area: 100,
        ..EngineConfig::default()
    };
    let mut world = WorldCore::with_config(config).unwrap();
    world.request_resize(10, 10).unwrap();
    world.run_frame().unwrap();

    world.request_resize(10, 11).unwrap();
    world.run_frame().unwrap();
    assert_eq!((world.width(), world.height()), (10, 10));

    // The product does not fit a 32-bit usize and must never wrap.
    world.request_resize(65_536, 65_537).unwrap();
    world.run_frame().unwrap();
    world.request_resize(u32::MAX, u32::MAX).unwrap();
    world.run_frame().unwrap();
    assert_eq!((world.width(), world.height()), (10, 10));
    assert_eq!(world.grid_snapshot().grid.len(), 100);
}

#[test]
fn default_area_limit_rejects_wrapping_sizes() {
    let mut world = WorldCore::new();
    world.request_resize(65_536, 65_537).unwrap();
    world.run_frame().unwrap();
    assert!(world.playfield().is_none());
}

#[test]
fn commands_without_a_grid_are_ignored() {
    let mut world = WorldCore::new();
    world.request_seed(0.5).unwrap();
    world.request_tick().unwrap();
    world.request_plot().unwrap();
    world.run_frame().unwrap();
    assert_eq!(world.population(), 0);
    assert_eq!(world.generation(), 0);
    assert!(!world.set_cell(0, 0, 1));
}

#[test]
fn plot_hands_updates_to_renderer_and_discards_them() {
    let (mut world, events) = world_with_renderer();
    world.request_resize(6, 6).unwrap();
    world.run_frame().unwrap();
    for x in 1..4 {
        world.set_cell(x, 2, 1);
    }

    world.request_plot().unwrap();
    world.request_tick().unwrap();
    world.request_plot().unwrap();
    world.execute().unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            Event::Plot { updates: 3, population: 3 },
            Event::Plot { updates: 4, population: 3 },
        ]
    );
    assert!(world.grid_snapshot().updates.is_empty());
}

#[test]
fn compaction_keeps_only_the_last_plot() {
    let (mut world, events) = world_with_renderer();
    world.request_resize(4, 4).unwrap();
    world.request_plot().unwrap();
    world.request_plot().unwrap();
    world.request_plot().unwrap();
    world.run_frame().unwrap();
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn hooks_wrap_the_renderer_call() {
    let (mut world, events) = world_with_renderer();
    world.request_resize(4, 4).unwrap();
    world.request_plot().unwrap();
    world.compact().unwrap();

    let before = events.clone();
    let after = events.clone();
    world
        .execute_with_hooks(
            |_| before.borrow_mut().push(Event::Before),
            |_| after.borrow_mut().push(Event::After),
        )
        .unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            Event::Before,
            Event::Plot { updates: 0, population: 0 },
            Event::After
        ]
    );
}

#[test]
fn clear_wipes_grid_and_notifies_renderer() {
    let (mut world, events) = world_with_renderer();
    world.request_resize(10, 10).unwrap();
    world.request_seed(0.5).unwrap();
    world.run_frame().unwrap();
    assert!(world.population() > 0);

    world.request_clear().unwrap();
    world.run_frame().unwrap();
    assert_eq!(world.population(), 0);
    assert_eq!(*events.borrow(), vec![Event::Clear]);
}

#[test]
fn detached_renderer_is_not_called() {
    let (mut world, events) = world_with_renderer();
    assert!(world.detach_renderer().is_some());
    world.request_resize(4, 4).unwrap();
    world.request_plot().unwrap();
    world.request_clear().unwrap();
    world.run_frame().unwrap();
    assert!(events.borrow().is_empty());
}

#[test]
fn every_tick_runs() {
    let mut world = WorldCore::new();
    world.request_resize(8, 8).unwrap();
    for _ in 0..5 {
        world.request_tick().unwrap();
    }
    world.run_frame().unwrap();
    assert_eq!(world.generation(), 5);
}

#[test]
fn invalid_percent_is_rejected_at_request_time() {
    let mut world = WorldCore::new();
    assert_eq!(world.request_seed(250.0), Err(EngineError::InvalidPercent(250.0)));
    assert_eq!(world.queue_depth(), 0);
}

#[test]
fn corrupted_opcode_aborts_execution() {
    let mut world = WorldCore::new();
    world.request_resize(4, 4).unwrap();
    world.request_tick().unwrap();
    // Overwrite the tick header with an unknown opcode.
    world.queue.words_mut()[3] = (b'?' as Word) << 8;

    let err = world.execute().unwrap_err();
    assert_eq!(err, EngineError::InvalidOpcode { code: b'?', offset: 3 });
    assert_eq!(world.generation(), 0);
}

#[test]
fn corrupted_queue_stays_poisoned_until_discarded() {
    let mut world = WorldCore::new();
    world.request_tick().unwrap();
    world.queue.words_mut()[0] = (b'?' as Word) << 8;

    assert!(world.execute().is_err());
    assert!(world.execute().is_err());
    assert_eq!(world.discard_queue(), 1);
    assert_eq!(world.queue_depth(), 0);

    world.request_resize(3, 3).unwrap();
    world.run_frame().unwrap();
    assert_eq!((world.width(), world.height()), (3, 3));
}

#[test]
fn mismatched_header_length_is_rejected() {
    let mut world = WorldCore::new();
    world.request_tick().unwrap();
    world.request_tick().unwrap();
    world.queue.words_mut()[0] = encode(Opcode::NextTick, 1) as Word;
    assert!(matches!(
        world.execute(),
        Err(EngineError::InvalidArgumentCount { opcode: Opcode::NextTick, .. })
    ));
}

#[test]
fn full_queue_reports_false_and_counts_drops() {
    let config = EngineConfig {
        queue_capacity: 3,
        ..EngineConfig::default()
    };
    let mut world = WorldCore::with_config(config).unwrap();
    assert_eq!(world.request_tick(), Ok(true));
    assert_eq!(world.request_tick(), Ok(true));
    assert_eq!(world.request_tick(), Ok(true));
    assert_eq!(world.request_tick(), Ok(false));
    assert_eq!(world.request_resize(2, 2), Ok(false));
    assert_eq!(world.get_perf_stats().requests_dropped(), 2);

    world.run_frame().unwrap();
    assert_eq!(world.request_resize(2, 2), Ok(true));
}

#[test]
fn stale_resizes_are_condensed_before_execution() {
    let mut world = WorldCore::new();
    for size in [3, 9, 4, 7] {
        world.request_resize(size, size + 1).unwrap();
    }
    let report = world.compact().unwrap();
    assert_eq!(report.condensed, 3);
    assert_eq!(
        world.queue().instruction_at(0).unwrap().0,
        Instruction::GridResize { width: 7, height: 8 }
    );
    world.execute().unwrap();
    assert_eq!((world.width(), world.height()), (7, 8));
}

#[test]
fn set_cell_respects_palette() {
    let mut world = WorldCore::new();
    world.request_resize(4, 4).unwrap();
    world.run_frame().unwrap();
    let k = world.config().palette.len() as u8;
    assert!(world.set_cell(0, 0, k));
    assert!(!world.set_cell(1, 0, k + 1));
    assert_eq!(world.grid_snapshot().index, &[LiveCell::new(k, 0, 0)]);
}

#[test]
fn perf_stats_track_counters_and_timings() {
    let mut world = WorldCore::new();
    world.enable_perf_metrics(true);
    world.request_resize(16, 16).unwrap();
    world.request_seed(0.3).unwrap();
    world.request_tick().unwrap();
    world.run_frame().unwrap();

    let stats = world.get_perf_stats();
    assert_eq!(stats.generation(), 1);
    assert_eq!(stats.population() as usize, world.population());
    assert_eq!(stats.instructions_executed(), 3);
    assert!(stats.execute_ms() >= 0.0);
    assert_eq!(stats.survive() + stats.birth(), stats.population());
}

#[test]
fn same_seed_same_world() {
    let run = |seed: u64| {
        let mut world = WorldCore::new();
        world.set_rng_seed(seed);
        world.request_resize(32, 32).unwrap();
        world.request_seed(0.4).unwrap();
        world.request_tick().unwrap();
        world.run_frame().unwrap();
        world.grid_snapshot().grid.to_vec()
    };
    assert_eq!(run(11), run(11));
    assert_ne!(run(11), run(12));
}

#[test]
fn snapshot_serializes_to_json() {
    let mut world = WorldCore::new();
    world.request_resize(2, 2).unwrap();
    world.run_frame().unwrap();
    world.set_cell(1, 0, 2);

    let json: serde_json::Value = serde_json::to_value(world.grid_snapshot()).unwrap();
    assert_eq!(json["width"], 2);
    assert_eq!(json["queueDepth"], 0);
    assert_eq!(json["grid"], serde_json::json!([0, 2, 0, 0]));
    assert_eq!(json["index"][0]["x"], 1);
    assert_eq!(json["survive"], 0);
}
