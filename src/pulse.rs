//! Post-processing parameters: per-theme bases, slow pulses and the
//! chromatic spike fired on every theme change.

use std::time::Duration;

use crate::config::SceneConfig;
use crate::theme::ThemeId;
use crate::tween::{ease_in_out, Tween};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBase {
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub bloom_smoothing: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
    pub chromatic_offset: f32,
}

const STANDARD: FilterBase = FilterBase {
    bloom_intensity: 0.2,
    bloom_threshold: 0.8,
    bloom_smoothing: 0.8,
    vignette_offset: 0.2,
    vignette_darkness: 0.8,
    chromatic_offset: 0.0,
};

/// Fallback when a theme has no entry of its own.
pub const FALLBACK_THEME: ThemeId = ThemeId::Electricity;

/// Base parameters for `theme`. All themes share one set for now.
pub fn base(theme: ThemeId) -> FilterBase {
    match theme {
        ThemeId::Electricity
        | ThemeId::Fire
        | ThemeId::Water
        | ThemeId::Nature
        | ThemeId::Wind
        | ThemeId::Ice
        | ThemeId::Shadow => STANDARD,
    }
}

/// Base parameters for a theme named by the page; unknown names use the
/// fallback theme.
pub fn base_named(name: &str) -> FilterBase {
    base(name.parse().unwrap_or(FALLBACK_THEME))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub bloom_smoothing: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
    pub chromatic_offset: [f32; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PulseSample {
    bloom: f32,
    vignette: f32,
    chromatic: f32,
}

/// `((sin(t·speed)+1)/2)·amplitude`, in `[0, amplitude]`.
fn wave(t: f32, speed: f32, amplitude: f32) -> f32 {
    ((t * speed).sin() + 1.0) / 2.0 * amplitude
}

#[derive(Debug, Clone)]
pub struct FilterPulse {
    sample: PulseSample,
    sampled_at: Option<Duration>,
    spike: Option<Tween>,
    config: SceneConfig,
}

impl FilterPulse {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            sample: PulseSample::default(),
            sampled_at: None,
            spike: None,
            config: config.clone(),
        }
    }

    /// Restarts the spike at its peak, dropping any spike still running.
    pub fn on_theme_change(&mut self, now: Duration) {
        self.spike = Some(
            Tween::new(now, self.config.spike(), self.config.spike_peak, 0.0).easing(ease_in_out),
        );
    }

    pub fn spike(&self, now: Duration) -> f32 {
        self.spike.map_or(0.0, |s| s.value(now))
    }

    /// Resamples the pulse if the throttle interval has passed. Returns
    /// whether a new sample was taken.
    pub fn tick(&mut self, now: Duration) -> bool {
        if let Some(at) = self.sampled_at {
            if now.saturating_sub(at) < self.config.pulse_sample() {
                return false;
            }
        }
        let t = now.as_secs_f32();
        let c = &self.config;
        self.sample = PulseSample {
            bloom: wave(t, c.bloom_pulse_speed, c.bloom_pulse_amplitude),
            vignette: wave(t, c.vignette_pulse_speed, c.vignette_pulse_amplitude),
            chromatic: wave(t, c.chromatic_pulse_speed, c.chromatic_pulse_amplitude),
        };
        self.sampled_at = Some(now);
        if self.spike.is_some_and(|s| s.is_complete(now)) {
            self.spike = None;
        }
        true
    }

    pub fn params(&self, theme: ThemeId, now: Duration) -> FilterParams {
        let base = base(theme);
        let chromatic = base.chromatic_offset + self.sample.chromatic + self.spike(now);
        FilterParams {
            bloom_intensity: base.bloom_intensity + self.sample.bloom,
            bloom_threshold: base.bloom_threshold,
            bloom_smoothing: base.bloom_smoothing,
            vignette_offset: base.vignette_offset,
            vignette_darkness: base.vignette_darkness + self.sample.vignette,
            chromatic_offset: [chromatic, chromatic],
        }
    }
}
