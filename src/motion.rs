//! Breathing, drift, pointer parallax and the entrance slide.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::SceneConfig;
use crate::crossfade::Layer;
use crate::tween::{ease_out, Tween};

/// Write side of the shared pointer position. Owned by the input handler.
#[derive(Debug, Default)]
pub struct PointerWriter {
    shared: Rc<Cell<[f32; 2]>>,
}

/// Read side of the shared pointer position.
#[derive(Debug, Clone)]
pub struct PointerReader {
    shared: Rc<Cell<[f32; 2]>>,
}

impl PointerWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reader(&self) -> PointerReader {
        PointerReader {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Stores a normalized position: x in [-1, 1] left to right, y in
    /// [-1, 1] bottom to top.
    pub fn set(&self, x: f32, y: f32) {
        self.shared.set([x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)]);
    }

    /// Normalizes client coordinates against the viewport size.
    pub fn move_to(&self, client_x: f32, client_y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.set(client_x / width * 2.0 - 1.0, -(client_y / height) * 2.0 + 1.0);
    }
}

impl PointerReader {
    pub fn get(&self) -> [f32; 2] {
        self.shared.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub scale: [f32; 2],
    pub position: [f32; 3],
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct AmbientMotion {
    pointer: PointerReader,
    parallax: [f32; 2],
    entrance: Tween,
    breathing_speed: f32,
    breathing_amplitude: f32,
    drift_speed: [f32; 2],
    drift_amplitude: [f32; 2],
    parallax_strength: f32,
    parallax_smoothing: f32,
}

impl AmbientMotion {
    /// The entrance slide is scheduled from `now`, once for the rig's lifetime.
    pub fn new(config: &SceneConfig, pointer: PointerReader, now: Duration) -> Self {
        Self {
            pointer,
            parallax: [0.0, 0.0],
            entrance: Tween::new(now, config.entrance(), config.entrance_start_z, 0.0)
                .delay(config.entrance_delay())
                .easing(ease_out),
            breathing_speed: config.breathing_speed,
            breathing_amplitude: config.breathing_amplitude,
            drift_speed: config.drift_speed,
            drift_amplitude: config.drift_amplitude,
            parallax_strength: config.parallax_strength,
            parallax_smoothing: config.parallax_smoothing,
        }
    }

    /// Scale multiplier in `[1, 1 + amplitude]`.
    pub fn breathing(&self, t: f32) -> f32 {
        1.0 + ((t * self.breathing_speed).sin() + 1.0) / 2.0 * self.breathing_amplitude
    }

    pub fn drift(&self, t: f32) -> [f32; 2] {
        [
            (t * self.drift_speed[0]).sin() * self.drift_amplitude[0],
            (t * self.drift_speed[1]).cos() * self.drift_amplitude[1],
        ]
    }

    pub fn parallax(&self) -> [f32; 2] {
        self.parallax
    }

    pub fn entrance_z(&self, now: Duration) -> f32 {
        self.entrance.value(now)
    }

    /// Moves the smoothed parallax one frame toward the inverted pointer.
    pub fn step(&mut self) {
        let [px, py] = self.pointer.get();
        let target = [-px * self.parallax_strength, -py * self.parallax_strength];
        for (current, target) in self.parallax.iter_mut().zip(target) {
            *current += (target - *current) * self.parallax_smoothing;
        }
    }

    /// Final transform for a layer whose cover size is `base_scale`.
    pub fn transform(&self, layer: &Layer, base_scale: [f32; 2], now: Duration) -> LayerTransform {
        let t = now.as_secs_f32();
        let breath = self.breathing(t);
        let [dx, dy] = self.drift(t);
        let [px, py] = self.parallax;
        LayerTransform {
            scale: [base_scale[0] * breath, base_scale[1] * breath],
            position: [
                layer.offset[0] + dx + px,
                layer.offset[1] + dy + py,
                self.entrance_z(now),
            ],
            opacity: layer.opacity,
        }
    }
}
