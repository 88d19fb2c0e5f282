#![cfg(target_arch = "wasm32")]

use lifequeue_engine::World;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn world_runs_a_frame_from_js() {
    let mut world = World::new(None).unwrap();
    assert!(world.request_resize(4, 4).unwrap());
    assert!(world.request_seed(1.0).unwrap());
    world.compact().unwrap();
    world.execute(None, None).unwrap();

    assert_eq!(world.population(), 16);
    assert_eq!(world.index_len(), 48);
    assert_eq!(world.grid_len(), 16);
}

#[wasm_bindgen_test]
fn snapshot_json_reports_dimensions() {
    let mut world = World::new(None).unwrap();
    world.request_resize(3, 2).unwrap();
    world.compact().unwrap();
    world.execute(None, None).unwrap();

    let json = world.snapshot_json().unwrap();
    assert!(json.contains("\"width\":3"));
    assert!(json.contains("\"height\":2"));
}
