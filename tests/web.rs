#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use elemental_wasm::loader::AssetOutcome;
use elemental_wasm::motion::PointerWriter;
use elemental_wasm::{KeyInput, Scene, SceneConfig, ThemeId};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap()
}

#[wasm_bindgen_test]
fn webgl2_context_is_available() {
    let context = canvas().get_context("webgl2").unwrap();
    assert!(context.is_some());
}

#[wasm_bindgen_test]
fn canvas_data_config_is_read_with_fallback() {
    let canvas = canvas();
    let read = |c: &web_sys::HtmlCanvasElement| {
        SceneConfig::from_attribute(c.get_attribute("data-config").as_deref())
    };
    assert_eq!(read(&canvas), SceneConfig::default());

    canvas
        .set_attribute("data-config", r#"{"transition_ms": 900}"#)
        .unwrap();
    assert_eq!(read(&canvas).transition(), Duration::from_millis(900));

    canvas.set_attribute("data-config", "{broken").unwrap();
    assert_eq!(read(&canvas), SceneConfig::default());
}

#[wasm_bindgen_test]
fn scene_runs_on_the_page_clock() {
    let performance = web_sys::window().unwrap().performance().unwrap();
    let start = performance.now();
    let elapsed = || Duration::from_secs_f64((performance.now() - start).max(0.0) / 1000.0);

    let config = SceneConfig {
        min_loading_ms: 0,
        loading_exit_ms: 0,
        ..SceneConfig::default()
    };
    let pointer = PointerWriter::new();
    let mut scene = Scene::new(config, pointer.reader(), 9, elapsed());
    for _ in 0..7 {
        scene.record_asset(AssetOutcome::Loaded, elapsed());
    }

    let now = elapsed();
    assert!(scene.key(KeyInput::Next, now).is_some());
    let frame = scene.frame(now + Duration::from_millis(600));
    assert_eq!(frame.theme, ThemeId::Fire);
}
