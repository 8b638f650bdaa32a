pub mod runner;

pub use runner::EffectsRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<EffectsRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the installed runner. Before `fx_init` succeeds every call is a no-op
/// returning `default`.
fn with_runner<R>(default: R, f: impl FnOnce(&mut EffectsRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => default,
    })
}

/// Install the effects. `config_json` may be empty for the default scene.
/// Calling it again replaces the running effects.
#[wasm_bindgen]
pub fn fx_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let runner = EffectsRunner::from_json(config_json, seed)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!(
        "pulsefx initialized: {} max instances, {} max vertices",
        runner.max_instances(),
        runner.max_vertices()
    );
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    Ok(())
}

/// Advance one animation frame. `now` is in seconds; `width`/`height` are the canvas size
/// in pixels (0 while the canvas has not been laid out).
#[wasm_bindgen]
pub fn fx_frame(now: f64, audio_level: f32, width: f32, height: f32) {
    with_runner((), |r| r.frame(now, audio_level, width, height));
}

#[wasm_bindgen]
pub fn fx_launch(x: f32, y: f32) -> u32 {
    with_runner(0, |r| r.launch(x, y))
}

// ---- Shared-memory accessors ----

#[wasm_bindgen]
pub fn get_frame_buffer_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.frame_buffer_ptr())
}

#[wasm_bindgen]
pub fn get_frame_buffer_len() -> u32 {
    with_runner(0, |r| r.frame_buffer_len())
}

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(0, |r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_vertices_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.vertices_ptr())
}

#[wasm_bindgen]
pub fn get_vertex_count() -> u32 {
    with_runner(0, |r| r.vertex_count())
}

#[wasm_bindgen]
pub fn get_particle_count() -> u32 {
    with_runner(0, |r| r.particle_count())
}

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(0, |r| r.max_instances())
}

#[wasm_bindgen]
pub fn get_max_vertices() -> u32 {
    with_runner(0, |r| r.max_vertices())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(0, |r| r.buffer_total_floats())
}
