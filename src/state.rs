//! Active theme and the guarded change operation.
//!
//! `ThemeState` is the single owner of the active theme. Readers either
//! consume the events returned from [`ThemeState::advance`] or register a
//! callback with [`ThemeState::subscribe`].

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::theme::{Palette, ThemeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    /// A change was accepted; `is_transitioning` is now true.
    TransitionStarted { from: ThemeId, to: ThemeId },
    /// The midpoint was reached and `current` now names the new theme.
    Swapped { from: ThemeId, to: ThemeId },
    /// The transition window closed.
    Settled { theme: ThemeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

#[derive(Debug, Clone, Copy)]
enum Pending {
    Swap { target: ThemeId, started: Duration },
    Settle { started: Duration },
}

type Listener = Box<dyn FnMut(&ThemeEvent)>;

pub struct ThemeState {
    current: ThemeId,
    transitioning: bool,
    // One slot: scheduling a phase replaces whatever was there.
    pending: Option<Pending>,
    duration: Duration,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl ThemeState {
    pub fn new(initial: ThemeId, duration: Duration) -> Self {
        Self {
            current: initial,
            transitioning: false,
            pending: None,
            duration,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn current(&self) -> ThemeId {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn palette(&self) -> &'static Palette {
        &self.current.theme().colors
    }

    /// Requests a switch to `target`.
    ///
    /// Ignored when `target` is already active or a transition is running.
    pub fn change_theme(&mut self, target: ThemeId, now: Duration) -> Option<ThemeEvent> {
        if target == self.current || self.transitioning {
            return None;
        }
        self.transitioning = true;
        self.pending = Some(Pending::Swap {
            target,
            started: now,
        });
        let event = ThemeEvent::TransitionStarted {
            from: self.current,
            to: target,
        };
        debug!(from = %self.current, to = %target, "theme transition started");
        self.notify(&event);
        Some(event)
    }

    /// Like [`change_theme`](Self::change_theme), for names coming from the page.
    /// Unknown names are ignored.
    pub fn change_theme_named(&mut self, name: &str, now: Duration) -> Option<ThemeEvent> {
        match name.parse() {
            Ok(target) => self.change_theme(target, now),
            Err(err) => {
                debug!(%err, "theme change ignored");
                None
            }
        }
    }

    /// Runs every phase that is due at `now`, in order.
    pub fn advance(&mut self, now: Duration) -> Vec<ThemeEvent> {
        let half = self.duration / 2;
        let mut events = Vec::new();
        loop {
            let event = match self.pending {
                Some(Pending::Swap { target, started }) if now >= started + half => {
                    let from = self.current;
                    self.current = target;
                    self.pending = Some(Pending::Settle { started });
                    ThemeEvent::Swapped { from, to: target }
                }
                Some(Pending::Settle { started }) if now >= started + self.duration => {
                    self.transitioning = false;
                    self.pending = None;
                    ThemeEvent::Settled {
                        theme: self.current,
                    }
                }
                _ => break,
            };
            debug!(?event, "theme transition phase");
            self.notify(&event);
            events.push(event);
        }
        events
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ThemeEvent) + 'static) -> Subscription {
        let id = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: &ThemeEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

/// Sink for process-wide display variables (CSS custom properties on the web).
pub trait DisplayVars {
    fn set_var(&mut self, name: &str, value: &str);
}

impl DisplayVars for BTreeMap<String, String> {
    fn set_var(&mut self, name: &str, value: &str) {
        self.insert(name.to_owned(), value.to_owned());
    }
}

pub fn sync_palette(vars: &mut dyn DisplayVars, palette: &Palette) {
    for (name, value) in palette.vars() {
        vars.set_var(name, value);
    }
}
