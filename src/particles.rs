//! Dust particles drifting upward in front of the background plane.

use std::time::Duration;

use rand::Rng;

use crate::config::SceneConfig;
use crate::tween::{ease_out, Tween};

pub const SIZE: f32 = 0.04;
pub const OPACITY: f32 = 0.6;
pub const SPEED: f32 = 0.1;
pub const SPREAD: [f32; 3] = [2.0, 1.0, 1.0];
pub const Z_OFFSET: f32 = 2.0;
pub const ENTRANCE_DELAY: Duration = Duration::from_secs(4);
pub const ENTRANCE_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Particles {
    positions: Vec<[f32; 3]>,
    fade_in: Tween,
}

fn random_x<R: Rng>(rng: &mut R) -> f32 {
    (rng.random::<f32>() - 0.5) * SPREAD[0] * 2.0
}

impl Particles {
    pub fn new<R: Rng>(config: &SceneConfig, now: Duration, rng: &mut R) -> Self {
        let positions = (0..config.particle_count)
            .map(|_| {
                [
                    random_x(rng),
                    (rng.random::<f32>() - 0.5) * SPREAD[1] * 2.0,
                    Z_OFFSET + rng.random::<f32>() * SPREAD[2],
                ]
            })
            .collect();
        Self {
            positions,
            fade_in: Tween::new(now, ENTRANCE_DURATION, 0.0, OPACITY)
                .delay(ENTRANCE_DELAY)
                .easing(ease_out),
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn opacity(&self, now: Duration) -> f32 {
        self.fade_in.value(now)
    }

    /// Moves every particle up by `dt`; particles leaving the top re-enter
    /// at the bottom with a fresh x.
    pub fn step<R: Rng>(&mut self, dt: Duration, rng: &mut R) {
        let rise = SPEED * dt.as_secs_f32();
        for p in &mut self.positions {
            p[1] += rise;
            if p[1] > SPREAD[1] {
                p[1] = -SPREAD[1];
                p[0] = random_x(rng);
            }
        }
    }
}
