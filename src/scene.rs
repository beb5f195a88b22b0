//! Owns every animated piece and advances them from one clock.
//!
//! The host calls [`Scene::frame`] once per animation frame with the time
//! since mount, and forwards input through [`Scene::key`] and
//! [`Scene::record_asset`]. Nothing in here schedules its own callbacks.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::SceneConfig;
use crate::crossfade::{cover_scale, CrossfadeRig};
use crate::glitch::GlitchText;
use crate::loader::{AssetOutcome, LoadPhase, LoadingScreen};
use crate::motion::{AmbientMotion, LayerTransform, PointerReader};
use crate::particles::{self, Particles};
use crate::pulse::{FilterParams, FilterPulse};
use crate::rotator::Rotator;
use crate::state::{sync_palette, DisplayVars, ThemeEvent, ThemeState};
use crate::theme::{hex_to_rgb, Palette, ThemeId, THEMES};

pub const CAMERA_DISTANCE: f32 = 5.0;
pub const CAMERA_FOV_DEG: f32 = 50.0;

/// Visible world size at z = 0 for a viewport of the given aspect ratio.
pub fn world_viewport(aspect: f32) -> [f32; 2] {
    let height = 2.0 * (CAMERA_FOV_DEG.to_radians() / 2.0).tan() * CAMERA_DISTANCE;
    [height * aspect, height]
}

/// Background images preloaded behind the loading screen, in theme order.
pub fn background_assets() -> impl Iterator<Item = (ThemeId, &'static str)> {
    THEMES.iter().map(|t| (t.id, t.background))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Next,
    Previous,
}

impl KeyInput {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "ArrowRight" => Some(KeyInput::Next),
            "ArrowUp" | "ArrowLeft" => Some(KeyInput::Previous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub theme: ThemeId,
    pub background: &'static str,
    pub transform: LayerTransform,
    pub incoming: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleFrame {
    pub positions: Vec<[f32; 3]>,
    pub color: [f32; 3],
    pub opacity: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneTexts {
    pub name: String,
    pub kanji: String,
    pub title: String,
    pub text: String,
    pub translation: String,
    pub loading_glyph: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub theme: ThemeId,
    pub transitioning: bool,
    pub palette: &'static Palette,
    pub layers: Vec<RenderLayer>,
    pub particles: ParticleFrame,
    pub filter: FilterParams,
    pub texts: SceneTexts,
    pub loading: LoadPhase,
    pub events: Vec<ThemeEvent>,
}

pub struct Scene {
    theme: ThemeState,
    crossfade: CrossfadeRig,
    motion: AmbientMotion,
    pulse: FilterPulse,
    particles: Particles,
    loading: LoadingScreen,
    name: GlitchText,
    kanji: GlitchText,
    title: GlitchText,
    text: GlitchText,
    translations: Rotator,
    loading_glyphs: Rotator,
    viewport: [f32; 2],
    image_aspect: [f32; 7],
    last_frame: Duration,
    rng: SmallRng,
    display: Option<Box<dyn DisplayVars>>,
}

impl Scene {
    pub fn new(config: SceneConfig, pointer: PointerReader, seed: u64, now: Duration) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let initial = ThemeId::DEFAULT;
        let theme = initial.theme();
        Self {
            theme: ThemeState::new(initial, config.transition()),
            crossfade: CrossfadeRig::new(initial, config.crossfade()),
            motion: AmbientMotion::new(&config, pointer, now),
            pulse: FilterPulse::new(&config),
            particles: Particles::new(&config, now, &mut rng),
            loading: LoadingScreen::new(THEMES.len(), &config, now),
            name: GlitchText::new(theme.name),
            kanji: GlitchText::new(theme.kanji),
            title: GlitchText::new(theme.title),
            text: GlitchText::new(theme.text),
            translations: Rotator::translations(now),
            loading_glyphs: Rotator::loading_glyphs(now),
            viewport: world_viewport(16.0 / 9.0),
            image_aspect: [1.0; 7],
            last_frame: now,
            rng,
            display: None,
        }
    }

    pub fn theme_state(&self) -> &ThemeState {
        &self.theme
    }

    /// For registering subscribers.
    pub fn theme_state_mut(&mut self) -> &mut ThemeState {
        &mut self.theme
    }

    pub fn crossfade(&self) -> &CrossfadeRig {
        &self.crossfade
    }

    pub fn loading(&self) -> &LoadingScreen {
        &self.loading
    }

    /// Attaches the sink for palette variables and writes the current
    /// palette to it. Every later swap rewrites the three variables.
    pub fn set_display_vars(&mut self, mut vars: Box<dyn DisplayVars>) {
        sync_palette(vars.as_mut(), self.theme.palette());
        self.display = Some(vars);
    }

    pub fn set_viewport_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.viewport = world_viewport(aspect);
        }
    }

    pub fn set_image_aspect(&mut self, theme: ThemeId, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.image_aspect[theme.index()] = aspect;
        }
    }

    pub fn record_asset(&mut self, outcome: AssetOutcome, now: Duration) {
        self.loading.record(outcome, now);
    }

    /// Theme requests are ignored until the loading screen is gone.
    pub fn change_theme(&mut self, target: ThemeId, now: Duration) -> Option<ThemeEvent> {
        if !self.loading.is_done(now) {
            return None;
        }
        self.theme.change_theme(target, now)
    }

    /// Request by theme key, as sent by the switcher buttons. Unknown keys
    /// and requests made while loading are ignored.
    pub fn change_theme_named(&mut self, name: &str, now: Duration) -> Option<ThemeEvent> {
        if !self.loading.is_done(now) {
            return None;
        }
        self.theme.change_theme_named(name, now)
    }

    pub fn key(&mut self, key: KeyInput, now: Duration) -> Option<ThemeEvent> {
        let current = self.theme.current();
        let target = match key {
            KeyInput::Next => current.next(),
            KeyInput::Previous => current.prev(),
        };
        self.change_theme(target, now)
    }

    pub fn frame(&mut self, now: Duration) -> Frame {
        let dt = now.saturating_sub(self.last_frame);
        self.last_frame = now;

        let events = self.theme.advance(now);
        for event in &events {
            if let ThemeEvent::Swapped { to, .. } = event {
                self.pulse.on_theme_change(now);
                if let Some(vars) = self.display.as_mut() {
                    sync_palette(vars.as_mut(), &to.theme().colors);
                }
            }
        }

        let current = self.theme.current();
        let transitioning = self.theme.is_transitioning();
        let theme = current.theme();
        for (glitch, value) in [
            (&mut self.name, theme.name),
            (&mut self.kanji, theme.kanji),
            (&mut self.title, theme.title),
            (&mut self.text, theme.text),
        ] {
            glitch.set_text(value);
            glitch.set_transitioning(transitioning, now);
        }

        // Finish first so a change that arrived mid-fade is seen right away.
        self.crossfade.advance(now);
        self.crossfade.observe(current, now);

        self.motion.step();
        self.particles.step(dt, &mut self.rng);
        self.pulse.tick(now);

        let texts = SceneTexts {
            name: self.name.advance(now, &mut self.rng).to_owned(),
            kanji: self.kanji.advance(now, &mut self.rng).to_owned(),
            title: self.title.advance(now, &mut self.rng).to_owned(),
            text: self.text.advance(now, &mut self.rng).to_owned(),
            translation: self.translations.advance(now, &mut self.rng).to_owned(),
            loading_glyph: self.loading_glyphs.advance(now, &mut self.rng).to_owned(),
        };

        let layers = self
            .crossfade
            .layers(now)
            .into_iter()
            .map(|layer| {
                let base = cover_scale(
                    self.viewport,
                    self.image_aspect[layer.theme.index()],
                    layer.zoom,
                );
                RenderLayer {
                    theme: layer.theme,
                    background: layer.theme.theme().background,
                    transform: self.motion.transform(&layer, base, now),
                    incoming: layer.incoming,
                }
            })
            .collect();

        Frame {
            theme: current,
            transitioning,
            palette: &theme.colors,
            layers,
            particles: ParticleFrame {
                positions: self.particles.positions().to_vec(),
                color: hex_to_rgb(theme.colors.third).unwrap_or([1.0, 1.0, 1.0]),
                opacity: self.particles.opacity(now),
                size: particles::SIZE,
            },
            filter: self.pulse.params(current, now),
            texts,
            loading: self.loading.phase(now),
            events,
        }
    }
}
