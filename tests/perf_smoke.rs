use lifequeue_engine::WorldCore;

#[test]
fn perf_smoke_frame() {
    let mut world = WorldCore::new();
    world.enable_perf_metrics(true);
    world.request_resize(128, 64).unwrap();
    world.request_seed(0.35).unwrap();
    for _ in 0..8 {
        world.request_tick().unwrap();
    }
    world.request_plot().unwrap();
    world.run_frame().unwrap();

    let stats = world.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert!(stats.execute_ms() >= stats.step_ms());
    assert_eq!(stats.generation(), 8);
    assert_eq!(stats.queue_depth(), 0);
}
