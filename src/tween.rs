//! Easing curves and clock-driven tweens.
//!
//! A [`Tween`] never accumulates time itself. It remembers when it started
//! and evaluates its value from the clock reading passed in, so a late or
//! skipped frame lands on the same value it would have had anyway.

use std::time::Duration;

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Interpolates `from → to` over `duration`, optionally after a `delay`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    start: Duration,
    delay: Duration,
    duration: Duration,
    from: f32,
    to: f32,
    easing: EasingFn,
}

impl Tween {
    pub fn new(start: Duration, duration: Duration, from: f32, to: f32) -> Self {
        Self {
            start,
            delay: Duration::ZERO,
            duration,
            from,
            to,
            easing: linear,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress before easing, in [0, 1].
    pub fn raw_progress(&self, now: Duration) -> f32 {
        let begin = self.start + self.delay;
        if now <= begin {
            return if self.duration.is_zero() && now == begin { 1.0 } else { 0.0 };
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (now - begin).as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self, now: Duration) -> f32 {
        (self.easing)(self.raw_progress(now))
    }

    pub fn value(&self, now: Duration) -> f32 {
        self.from + (self.to - self.from) * self.progress(now)
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.end()
    }

    /// Clock reading at which the tween reaches `to`.
    pub fn end(&self) -> Duration {
        self.start + self.delay + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn easing_endpoints() {
        for f in [linear as EasingFn, ease_out, ease_in_out] {
            assert_eq!(f(0.0), 0.0);
            assert!((f(1.0) - 1.0).abs() < 1e-6);
            assert_eq!(f(-3.0), 0.0);
            assert!((f(7.0) - 1.0).abs() < 1e-6);
        }
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn easing_is_monotonic() {
        for f in [linear as EasingFn, ease_out, ease_in_out] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = f(i as f32 / 100.0);
                assert!(v + 1e-6 >= prev);
                prev = v;
            }
        }
    }

    #[test]
    fn tween_honours_delay() {
        let t = Tween::new(ms(1000), ms(2000), 2.0, 0.0)
            .delay(ms(3000))
            .easing(ease_out);
        assert_eq!(t.value(ms(0)), 2.0);
        assert_eq!(t.value(ms(4000)), 2.0);
        assert!(t.value(ms(5000)) < 2.0);
        assert!(!t.is_complete(ms(5999)));
        assert!(t.is_complete(ms(6000)));
        assert_eq!(t.value(ms(6000)), 0.0);
    }

    #[test]
    fn zero_duration_completes_at_start() {
        let t = Tween::new(ms(10), Duration::ZERO, 0.0, 1.0);
        assert_eq!(t.value(ms(9)), 0.0);
        assert_eq!(t.value(ms(10)), 1.0);
        assert!(t.is_complete(ms(10)));
    }
}
