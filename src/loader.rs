//! Loading screen bookkeeping: asset progress, minimum display time, exit.

use std::time::Duration;

use tracing::debug;

use crate::config::SceneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadPhase {
    Loading { progress: f32 },
    /// Everything is in; waiting out the minimum display time.
    Holding,
    Exiting { progress: f32 },
    Done,
}

#[derive(Debug, Clone)]
pub struct LoadingScreen {
    total: usize,
    settled: usize,
    failed: usize,
    started: Duration,
    /// Clock reading at which the last asset settled.
    completed: Option<Duration>,
    min_display: Duration,
    exit: Duration,
}

impl LoadingScreen {
    pub fn new(total: usize, config: &SceneConfig, now: Duration) -> Self {
        Self {
            total,
            settled: 0,
            failed: 0,
            started: now,
            completed: (total == 0).then_some(now),
            min_display: config.min_loading(),
            exit: config.loading_exit(),
        }
    }

    /// Counts an asset as settled. Failures count the same as loads.
    pub fn record(&mut self, outcome: AssetOutcome, now: Duration) {
        if self.settled >= self.total {
            return;
        }
        self.settled += 1;
        if outcome == AssetOutcome::Failed {
            self.failed += 1;
        }
        if self.settled == self.total {
            self.completed = Some(now);
            debug!(total = self.total, failed = self.failed, "assets settled");
        }
    }

    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.settled as f32 / self.total as f32
        }
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// When the exit animation starts, once all assets are settled.
    fn exit_at(&self) -> Option<Duration> {
        self.completed
            .map(|done| done.max(self.started + self.min_display))
    }

    pub fn phase(&self, now: Duration) -> LoadPhase {
        let Some(exit_at) = self.exit_at() else {
            return LoadPhase::Loading {
                progress: self.progress(),
            };
        };
        if now < exit_at {
            return LoadPhase::Holding;
        }
        let into_exit = now - exit_at;
        if into_exit >= self.exit {
            LoadPhase::Done
        } else {
            LoadPhase::Exiting {
                progress: into_exit.as_secs_f32() / self.exit.as_secs_f32(),
            }
        }
    }

    pub fn is_done(&self, now: Duration) -> bool {
        self.phase(now) == LoadPhase::Done
    }
}
