//! Scramble-then-reveal text effect tied to the theme transition flag.

use std::time::Duration;

use rand::Rng;

pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const KANJI: &str = "獅龍虎鬼神風火雷水土氷影自然";

pub const SCRAMBLE_INTERVAL: Duration = Duration::from_millis(50);
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(40);
pub const REVEAL_STEPS: u32 = 8;

/// CJK symbols, kana and unified ideographs.
fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3000}'..='\u{9FFF}')
}

pub fn is_scrambleable(c: char) -> bool {
    c.is_ascii_alphabetic() || is_cjk(c)
}

pub fn random_from<R: Rng>(alphabet: &str, rng: &mut R) -> char {
    let count = alphabet.chars().count();
    if count == 0 {
        return ' ';
    }
    alphabet.chars().nth(rng.random_range(0..count)).unwrap_or(' ')
}

/// Replaces `c` with a random character of the same class.
pub fn scramble_char<R: Rng>(c: char, rng: &mut R) -> char {
    if c.is_ascii_uppercase() {
        random_from(UPPER, rng)
    } else if c.is_ascii_lowercase() {
        random_from(LOWER, rng)
    } else if is_cjk(c) {
        random_from(KANJI, rng)
    } else {
        c
    }
}

/// Scrambles every character at or after position `locked`.
pub fn scramble_from<R: Rng>(text: &str, locked: usize, rng: &mut R) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| if i < locked { c } else { scramble_char(c, rng) })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchPhase {
    Idle,
    /// `frame` is `None` until the first scramble has been drawn.
    Scrambling { since: Duration, frame: Option<u64> },
    Revealing { since: Duration, step: u32 },
}

#[derive(Debug, Clone)]
pub struct GlitchText {
    target: String,
    display: String,
    phase: GlitchPhase,
    flag: bool,
}

impl GlitchText {
    /// Starts idle, showing `text` as is.
    pub fn new(text: impl Into<String>) -> Self {
        let target = text.into();
        Self {
            display: target.clone(),
            target,
            phase: GlitchPhase::Idle,
            flag: false,
        }
    }

    pub fn phase(&self) -> GlitchPhase {
        self.phase
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_text(&mut self, text: &str) {
        if self.target == text {
            return;
        }
        self.target = text.to_owned();
        if self.phase == GlitchPhase::Idle {
            self.display.clone_from(&self.target);
        }
    }

    /// Follows the external transition flag. Only edges change the phase.
    pub fn set_transitioning(&mut self, flag: bool, now: Duration) {
        if flag == self.flag {
            return;
        }
        self.flag = flag;
        self.phase = if flag {
            GlitchPhase::Scrambling {
                since: now,
                frame: None,
            }
        } else {
            match self.phase {
                GlitchPhase::Scrambling { .. } => GlitchPhase::Revealing {
                    since: now,
                    step: 0,
                },
                other => other,
            }
        };
    }

    /// Produces the text to show at `now`.
    pub fn advance<R: Rng>(&mut self, now: Duration, rng: &mut R) -> &str {
        match self.phase {
            GlitchPhase::Idle => {}
            GlitchPhase::Scrambling { since, frame } => {
                let due = elapsed_ticks(since, now, SCRAMBLE_INTERVAL);
                if frame != Some(due) {
                    self.display = scramble_from(&self.target, 0, rng);
                    self.phase = GlitchPhase::Scrambling {
                        since,
                        frame: Some(due),
                    };
                }
            }
            GlitchPhase::Revealing { since, step } => {
                let due = elapsed_ticks(since, now, REVEAL_INTERVAL)
                    .min(u64::from(REVEAL_STEPS)) as u32;
                if due >= REVEAL_STEPS {
                    self.display.clone_from(&self.target);
                    self.phase = GlitchPhase::Idle;
                } else if due != step {
                    let len = self.target.chars().count();
                    let locked = (due as f32 / REVEAL_STEPS as f32 * len as f32).round() as usize;
                    self.display = scramble_from(&self.target, locked, rng);
                    self.phase = GlitchPhase::Revealing { since, step: due };
                }
            }
        }
        &self.display
    }
}

fn elapsed_ticks(since: Duration, now: Duration, interval: Duration) -> u64 {
    let elapsed = now.saturating_sub(since);
    (elapsed.as_nanos() / interval.as_nanos().max(1)) as u64
}
