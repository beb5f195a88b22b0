//! Timing and amplitude knobs for the scene.
//!
//! Every field has a default, so a page can override a single value with
//! `data-config='{"crossfade_ms": 900}'` and keep the rest.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Full theme transition; the swap happens at the midpoint.
    pub transition_ms: u64,
    pub crossfade_ms: u64,

    pub spike_ms: u64,
    pub spike_peak: f32,
    pub pulse_sample_ms: u64,
    pub bloom_pulse_speed: f32,
    pub bloom_pulse_amplitude: f32,
    pub vignette_pulse_speed: f32,
    pub vignette_pulse_amplitude: f32,
    pub chromatic_pulse_speed: f32,
    pub chromatic_pulse_amplitude: f32,

    pub breathing_speed: f32,
    pub breathing_amplitude: f32,
    pub drift_speed: [f32; 2],
    pub drift_amplitude: [f32; 2],
    pub parallax_strength: f32,
    pub parallax_smoothing: f32,
    pub entrance_start_z: f32,
    pub entrance_delay_ms: u64,
    pub entrance_ms: u64,

    pub particle_count: usize,

    pub min_loading_ms: u64,
    pub loading_exit_ms: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            transition_ms: 600,
            crossfade_ms: 600,
            spike_ms: 600,
            spike_peak: 0.004,
            pulse_sample_ms: 100,
            bloom_pulse_speed: 0.6,
            bloom_pulse_amplitude: 0.2,
            vignette_pulse_speed: 0.6,
            vignette_pulse_amplitude: 0.2,
            chromatic_pulse_speed: 0.0,
            chromatic_pulse_amplitude: 0.0,
            breathing_speed: 0.6,
            breathing_amplitude: 0.04,
            drift_speed: [0.2, 0.2],
            drift_amplitude: [0.15, 0.15],
            parallax_strength: 0.04,
            parallax_smoothing: 0.04,
            entrance_start_z: 2.0,
            entrance_delay_ms: 3000,
            entrance_ms: 2000,
            particle_count: 60,
            min_loading_ms: 3500,
            loading_exit_ms: 1200,
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Reads an optional `data-config` attribute value. A missing attribute
    /// or malformed JSON yields the defaults.
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some(json) => Self::from_json(json).unwrap_or_else(|err| {
                warn!(%err, "ignoring data-config");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Clamps values that would stall or explode the animations.
    pub fn sanitized(mut self) -> Self {
        self.parallax_smoothing = self.parallax_smoothing.clamp(f32::EPSILON, 1.0);
        self.pulse_sample_ms = self.pulse_sample_ms.max(1);
        self
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn crossfade(&self) -> Duration {
        Duration::from_millis(self.crossfade_ms)
    }

    pub fn spike(&self) -> Duration {
        Duration::from_millis(self.spike_ms)
    }

    pub fn pulse_sample(&self) -> Duration {
        Duration::from_millis(self.pulse_sample_ms)
    }

    pub fn entrance_delay(&self) -> Duration {
        Duration::from_millis(self.entrance_delay_ms)
    }

    pub fn entrance(&self) -> Duration {
        Duration::from_millis(self.entrance_ms)
    }

    pub fn min_loading(&self) -> Duration {
        Duration::from_millis(self.min_loading_ms)
    }

    pub fn loading_exit(&self) -> Duration {
        Duration::from_millis(self.loading_exit_ms)
    }
}
