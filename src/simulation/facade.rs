use js_sys::{Function, Object, Reflect, Uint32Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::domain::error::EngineError;
use crate::spatial::playfield::as_words;

use super::perf_stats::PerfStats;
use super::render::{GridSnapshot, Renderer};
use super::WorldCore;

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

/// Copy a snapshot into a plain JS object (typed arrays, numbers).
fn snapshot_to_js(snapshot: &GridSnapshot<'_>) -> Result<Object, JsValue> {
    let out = Object::new();
    set(&out, "grid", &Uint8Array::from(snapshot.grid).into())?;
    set(&out, "index", &Uint32Array::from(as_words(snapshot.index)).into())?;
    set(&out, "updates", &Uint32Array::from(as_words(snapshot.updates)).into())?;
    set(&out, "width", &snapshot.width.into())?;
    set(&out, "height", &snapshot.height.into())?;
    set(&out, "colors", &Uint32Array::from(snapshot.colors).into())?;
    set(&out, "survive", &snapshot.stats.survive.into())?;
    set(&out, "died", &snapshot.stats.died.into())?;
    set(&out, "birth", &snapshot.stats.birth.into())?;
    set(&out, "checked", &snapshot.stats.checked.into())?;
    set(&out, "queueDepth", &(snapshot.queue_depth as u32).into())?;
    set(&out, "generation", &(snapshot.generation as f64).into())?;
    Ok(out)
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("renderer is missing a `{}` method", name)))
}

/// JS object exposing `plotTheUpdates(snapshot)` and `clear()`.
struct JsRenderer {
    target: JsValue,
    plot: Function,
    clear: Function,
}

impl JsRenderer {
    fn new(target: JsValue) -> Result<Self, JsValue> {
        let plot = method(&target, "plotTheUpdates")?;
        let clear = method(&target, "clear")?;
        Ok(Self { target, plot, clear })
    }
}

impl Renderer for JsRenderer {
    fn plot_the_updates(&mut self, snapshot: &GridSnapshot<'_>) {
        let result = snapshot_to_js(snapshot).and_then(|s| self.plot.call1(&self.target, &s));
        if let Err(e) = result {
            web_sys::console::error_2(&"plotTheUpdates failed:".into(), &e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.clear.call0(&self.target) {
            web_sys::console::error_2(&"renderer clear failed:".into(), &e);
        }
    }
}

fn call_hook(hook: &Option<Function>, snapshot: &GridSnapshot<'_>) {
    let Some(f) = hook else { return };
    let result = snapshot_to_js(snapshot).and_then(|s| f.call1(&JsValue::NULL, &s));
    if let Err(e) = result {
        web_sys::console::error_2(&"plot hook failed:".into(), &e);
    }
}

#[wasm_bindgen]
pub struct World {
    core: WorldCore,
}

#[wasm_bindgen]
impl World {
    /// Create an engine; `config_json` may be omitted for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<World, JsValue> {
        let core = match config_json {
            Some(json) => WorldCore::from_config_json(&json).map_err(to_js)?,
            None => WorldCore::new(),
        };
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn population(&self) -> u32 { self.core.population() as u32 }

    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u64 { self.core.generation() }

    #[wasm_bindgen(getter, js_name = queueDepth)]
    pub fn queue_depth(&self) -> u32 { self.core.queue_depth() as u32 }

    #[wasm_bindgen(getter, js_name = queueCapacity)]
    pub fn queue_capacity(&self) -> u32 { self.core.queue_capacity() as u32 }

    // === REQUESTS ===
    // `false` means the queue is full; retry next frame or drop.

    #[wasm_bindgen(js_name = requestResize)]
    pub fn request_resize(&mut self, width: u32, height: u32) -> Result<bool, JsValue> {
        self.core.request_resize(width, height).map_err(to_js)
    }

    #[wasm_bindgen(js_name = requestSeed)]
    pub fn request_seed(&mut self, percent: f64) -> Result<bool, JsValue> {
        self.core.request_seed(percent).map_err(to_js)
    }

    #[wasm_bindgen(js_name = requestClear)]
    pub fn request_clear(&mut self) -> Result<bool, JsValue> {
        self.core.request_clear().map_err(to_js)
    }

    #[wasm_bindgen(js_name = requestTick)]
    pub fn request_tick(&mut self) -> Result<bool, JsValue> {
        self.core.request_tick().map_err(to_js)
    }

    #[wasm_bindgen(js_name = requestPlot)]
    pub fn request_plot(&mut self) -> Result<bool, JsValue> {
        self.core.request_plot().map_err(to_js)
    }

    /// Paint a cell immediately (brush / pattern tools)
    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&mut self, x: u32, y: u32, color: u8) -> bool {
        self.core.set_cell(x, y, color)
    }

    // === FRAME ===

    pub fn compact(&mut self) -> Result<(), JsValue> {
        self.core.compact().map(|_| ()).map_err(to_js)
    }

    /// Run the queue. Hooks receive a snapshot copy around every plot.
    pub fn execute(
        &mut self,
        before_plot: Option<Function>,
        after_plot: Option<Function>,
    ) -> Result<(), JsValue> {
        self.core
            .execute_with_hooks(
                |s| call_hook(&before_plot, s),
                |s| call_hook(&after_plot, s),
            )
            .map_err(to_js)
    }

    /// Drop all pending commands; recovers from a corrupted queue
    #[wasm_bindgen(js_name = discardQueue)]
    pub fn discard_queue(&mut self) -> u32 {
        self.core.discard_queue() as u32
    }

    // === RENDERING ===

    #[wasm_bindgen(js_name = attachRenderer)]
    pub fn attach_renderer(&mut self, renderer: JsValue) -> Result<(), JsValue> {
        self.core.attach_renderer(Box::new(JsRenderer::new(renderer)?));
        Ok(())
    }

    #[wasm_bindgen(js_name = detachRenderer)]
    pub fn detach_renderer(&mut self) {
        self.core.detach_renderer();
    }

    #[wasm_bindgen(js_name = getGridSnapshot)]
    pub fn get_grid_snapshot(&self) -> Result<Object, JsValue> {
        snapshot_to_js(&self.core.grid_snapshot())
    }

    /// DEBUG: snapshot as JSON
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.core.grid_snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // === ZERO-COPY VIEWS ===
    // Valid until the next call that mutates the engine.

    pub fn grid_ptr(&self) -> *const u8 {
        self.core.grid_snapshot().grid.as_ptr()
    }

    pub fn grid_len(&self) -> usize {
        self.core.grid_snapshot().grid.len()
    }

    pub fn index_ptr(&self) -> *const u32 {
        as_words(self.core.grid_snapshot().index).as_ptr()
    }

    /// Length in u32 words (3 per live cell)
    pub fn index_len(&self) -> usize {
        as_words(self.core.grid_snapshot().index).len()
    }

    pub fn updates_ptr(&self) -> *const u32 {
        as_words(self.core.grid_snapshot().updates).as_ptr()
    }

    pub fn updates_len(&self) -> usize {
        as_words(self.core.grid_snapshot().updates).len()
    }

    // === SETTINGS ===

    /// Enable or disable per-frame timing (adds overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.core.set_rng_seed(seed);
    }
}
