//! Two-layer opacity crossfade between background images.

use std::time::Duration;

use tracing::debug;

use crate::theme::ThemeId;
use crate::tween::{ease_in_out, Tween};

pub const DEFAULT_ZOOM: f32 = 1.1;

/// Per-theme zoom; 1.0 just covers the viewport.
pub fn zoom(theme: ThemeId) -> f32 {
    match theme {
        ThemeId::Electricity | ThemeId::Wind | ThemeId::Shadow => 1.2,
        ThemeId::Ice => 1.05,
        ThemeId::Fire | ThemeId::Water | ThemeId::Nature => DEFAULT_ZOOM,
    }
}

/// Per-theme framing offset in world units. Negative is left/down.
pub fn offset(theme: ThemeId) -> [f32; 2] {
    match theme {
        ThemeId::Electricity => [-0.24, 0.0],
        _ => [0.0, 0.0],
    }
}

/// Size of a plane that covers `viewport` (world units) at `zoom`, keeping
/// the image aspect ratio.
pub fn cover_scale(viewport: [f32; 2], image_aspect: f32, zoom: f32) -> [f32; 2] {
    let [w, h] = viewport;
    if w <= 0.0 || h <= 0.0 {
        return [0.0, 0.0];
    }
    let image_aspect = if image_aspect > 0.0 { image_aspect } else { 1.0 };
    if image_aspect > w / h {
        [h * image_aspect * zoom, h * zoom]
    } else {
        [w * zoom, w / image_aspect * zoom]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub theme: ThemeId,
    pub opacity: f32,
    pub zoom: f32,
    pub offset: [f32; 2],
    /// True for the layer fading in during a session.
    pub incoming: bool,
}

impl Layer {
    fn new(theme: ThemeId, opacity: f32, incoming: bool) -> Self {
        Self {
            theme,
            opacity,
            zoom: zoom(theme),
            offset: offset(theme),
            incoming,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    incoming: ThemeId,
    fade: Tween,
}

#[derive(Debug, Clone)]
pub struct CrossfadeRig {
    active: ThemeId,
    session: Option<Session>,
    duration: Duration,
}

impl CrossfadeRig {
    pub fn new(active: ThemeId, duration: Duration) -> Self {
        Self {
            active,
            session: None,
            duration,
        }
    }

    pub fn active(&self) -> ThemeId {
        self.active
    }

    pub fn incoming(&self) -> Option<ThemeId> {
        self.session.map(|s| s.incoming)
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Starts a session if `driving` differs from the active theme and the
    /// rig is idle. Returns whether a session started.
    pub fn observe(&mut self, driving: ThemeId, now: Duration) -> bool {
        if driving == self.active || self.session.is_some() {
            return false;
        }
        debug!(from = %self.active, to = %driving, "crossfade started");
        self.session = Some(Session {
            incoming: driving,
            fade: Tween::new(now, self.duration, 0.0, 1.0).easing(ease_in_out),
        });
        true
    }

    /// Finishes the session once its fade is complete. Returns whether the
    /// rig went back to idle on this call.
    pub fn advance(&mut self, now: Duration) -> bool {
        match self.session {
            Some(session) if session.fade.is_complete(now) => {
                self.active = session.incoming;
                self.session = None;
                debug!(active = %self.active, "crossfade finished");
                true
            }
            _ => false,
        }
    }

    /// `(outgoing, incoming)` opacities.
    pub fn opacities(&self, now: Duration) -> (f32, f32) {
        match self.session {
            Some(session) => {
                let t = session.fade.value(now);
                (1.0 - t, t)
            }
            None => (1.0, 0.0),
        }
    }

    /// Visible layers, back to front.
    pub fn layers(&self, now: Duration) -> Vec<Layer> {
        let (outgoing, incoming) = self.opacities(now);
        let mut layers = vec![Layer::new(self.active, outgoing, false)];
        if let Some(session) = self.session {
            layers.push(Layer::new(session.incoming, incoming, true));
        }
        layers
    }
}
