//! Cycles through a fixed list of strings, scrambling into each new entry.

use std::time::Duration;

use rand::Rng;

use crate::glitch::{random_from, UPPER};
use crate::theme::{LION_TRANSLATIONS, LOADING_GLYPHS};

/// Glyphs flashed between loading-screen entries.
pub const LOADING_SCRAMBLE: &str = "獅龍虎鬼神風火雷水土";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatorConfig {
    /// How long an entry stays on screen before the next scramble starts.
    pub hold: Duration,
    pub scramble_count: u32,
    pub scramble_interval: Duration,
    pub alphabet: &'static str,
}

impl RotatorConfig {
    /// Corner-text translations of "lion".
    pub const TRANSLATIONS: RotatorConfig = RotatorConfig {
        hold: Duration::from_millis(2500),
        scramble_count: 15,
        scramble_interval: Duration::from_millis(40),
        alphabet: UPPER,
    };

    /// Loading-screen glyphs.
    pub const LOADING: RotatorConfig = RotatorConfig {
        hold: Duration::from_millis(800),
        scramble_count: 4,
        scramble_interval: Duration::from_millis(50),
        alphabet: LOADING_SCRAMBLE,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Holding { since: Duration },
    Scrambling { since: Duration, drawn: u32 },
}

#[derive(Debug, Clone)]
pub struct Rotator {
    entries: Vec<String>,
    index: usize,
    display: String,
    phase: Phase,
    config: RotatorConfig,
}

impl Rotator {
    pub fn new<I, S>(entries: I, config: RotatorConfig, now: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        Self {
            display: entries.first().cloned().unwrap_or_default(),
            entries,
            index: 0,
            phase: Phase::Holding { since: now },
            config,
        }
    }

    pub fn translations(now: Duration) -> Self {
        Self::new(LION_TRANSLATIONS, RotatorConfig::TRANSLATIONS, now)
    }

    pub fn loading_glyphs(now: Duration) -> Self {
        Self::new(LOADING_GLYPHS, RotatorConfig::LOADING, now)
    }

    /// Index of the entry shown (or being scrambled away from).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_scrambling(&self) -> bool {
        matches!(self.phase, Phase::Scrambling { .. })
    }

    fn next_index(&self) -> usize {
        (self.index + 1) % self.entries.len().max(1)
    }

    pub fn advance<R: Rng>(&mut self, now: Duration, rng: &mut R) -> &str {
        if self.entries.len() < 2 {
            return &self.display;
        }
        // A long frame gap can cover several phases; walk them in order.
        loop {
            match self.phase {
                Phase::Holding { since } => {
                    let start = since + self.config.hold;
                    if now < start {
                        break;
                    }
                    self.phase = Phase::Scrambling {
                        since: start,
                        drawn: 0,
                    };
                }
                Phase::Scrambling { since, drawn } => {
                    let interval = self.config.scramble_interval;
                    // Frame k is drawn at since + k * interval, k = 1..=count;
                    // the target lands one interval after the last frame.
                    let due = (now.saturating_sub(since).as_nanos() / interval.as_nanos().max(1))
                        .min(u128::from(self.config.scramble_count) + 1) as u32;
                    if due > self.config.scramble_count {
                        let next = self.next_index();
                        self.index = next;
                        self.display.clone_from(&self.entries[next]);
                        let landed = since + interval * (self.config.scramble_count + 1);
                        self.phase = Phase::Holding { since: landed };
                        if self.config.hold.is_zero() && interval.is_zero() {
                            break;
                        }
                        continue;
                    }
                    if due > drawn {
                        let len = self.entries[self.next_index()].chars().count();
                        self.display = (0..len)
                            .map(|_| random_from(self.config.alphabet, rng))
                            .collect();
                        self.phase = Phase::Scrambling { since, drawn: due };
                    }
                    break;
                }
            }
        }
        &self.display
    }
}
