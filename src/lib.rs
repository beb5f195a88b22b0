#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Seven-element showcase: theme state, crossfades, text glitches and
//! filter pulses driven from one animation clock, rendered with WebGL2.

pub mod config;
pub mod crossfade;
pub mod error;
pub mod glitch;
pub mod loader;
pub mod motion;
pub mod particles;
pub mod pulse;
pub mod rotator;
pub mod scene;
pub mod state;
pub mod theme;
pub mod tween;

pub use config::SceneConfig;
pub use error::{Error, Result};
pub use scene::{Frame, KeyInput, Scene};
pub use theme::ThemeId;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod console;
    mod dom;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console::init_tracing();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        render::start(canvas)?;
        Ok(())
    }
}

