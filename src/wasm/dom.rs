use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, HtmlCanvasElement, HtmlElement};

use crate::loader::LoadPhase;
use crate::state::DisplayVars;
use crate::{Frame, SceneConfig, ThemeId};

/// Inline style of `<html>`; palette variables live here.
pub struct RootStyle(CssStyleDeclaration);

impl RootStyle {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let root = document
            .document_element()
            .ok_or("no root element")?
            .dyn_into::<HtmlElement>()?;
        Ok(Self(root.style()))
    }
}

impl DisplayVars for RootStyle {
    fn set_var(&mut self, name: &str, value: &str) {
        if let Err(err) = self.0.set_property(name, value) {
            warn!(var = name, ?err, "failed to set display variable");
        }
    }
}

pub fn read_config(canvas: &HtmlCanvasElement) -> SceneConfig {
    SceneConfig::from_attribute(canvas.get_attribute("data-config").as_deref())
}

/// A text node that only touches the DOM when its content changes. Missing
/// elements are tolerated so the page can leave any of them out.
struct TextSlot {
    element: Option<Element>,
    shown: String,
}

impl TextSlot {
    fn find(document: &Document, id: &str) -> Self {
        Self {
            element: document.get_element_by_id(id),
            shown: String::new(),
        }
    }

    fn set(&mut self, text: &str) {
        if self.shown == text {
            return;
        }
        if let Some(element) = &self.element {
            element.set_text_content(Some(text));
        }
        self.shown.clear();
        self.shown.push_str(text);
    }
}

pub struct Overlay {
    name: TextSlot,
    kanji: TextSlot,
    title: TextSlot,
    text: TextSlot,
    translation: TextSlot,
    loading_glyph: TextSlot,
    loading_progress: TextSlot,
    loading: Option<Element>,
    phase: &'static str,
    switcher: Vec<(ThemeId, Element)>,
    pressed: Option<ThemeId>,
}

impl Overlay {
    pub fn new(document: &Document) -> Self {
        Self {
            name: TextSlot::find(document, "element-name"),
            kanji: TextSlot::find(document, "element-kanji"),
            title: TextSlot::find(document, "element-title"),
            text: TextSlot::find(document, "element-text"),
            translation: TextSlot::find(document, "translation"),
            loading_glyph: TextSlot::find(document, "loading-glyph"),
            loading_progress: TextSlot::find(document, "loading-progress"),
            loading: document.get_element_by_id("loading"),
            phase: "",
            switcher: ThemeId::ALL
                .iter()
                .filter_map(|&id| {
                    let button = document.get_element_by_id(&format!("switch-{}", id.key()))?;
                    Some((id, button))
                })
                .collect(),
            pressed: None,
        }
    }

    pub fn apply(&mut self, frame: &Frame) -> Result<(), JsValue> {
        let texts = &frame.texts;
        self.name.set(&texts.name);
        self.kanji.set(&texts.kanji);
        self.title.set(&texts.title);
        self.text.set(&texts.text);
        self.translation.set(&texts.translation);
        self.loading_glyph.set(&texts.loading_glyph);

        let (phase, progress) = match frame.loading {
            LoadPhase::Loading { progress } => ("loading", progress),
            LoadPhase::Holding => ("holding", 1.0),
            LoadPhase::Exiting { .. } => ("exiting", 1.0),
            LoadPhase::Done => ("done", 1.0),
        };
        self.loading_progress
            .set(&format!("{}%", (progress * 100.0).round() as u32));
        if phase != self.phase {
            if let Some(loading) = &self.loading {
                loading.set_attribute("data-phase", phase)?;
            }
            self.phase = phase;
        }

        if self.pressed != Some(frame.theme) {
            for (id, button) in &self.switcher {
                let pressed = if *id == frame.theme { "true" } else { "false" };
                button.set_attribute("aria-pressed", pressed)?;
            }
            self.pressed = Some(frame.theme);
        }
        Ok(())
    }
}
