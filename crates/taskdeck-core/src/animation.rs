#![forbid(unsafe_code)]

//! Easing curves and a delayed tween.
//!
//! Everything here is a pure function of elapsed time. Callers keep the start
//! instant and ask for the value at `now - start`; there is no internal clock.
//!
//! # Invariants
//!
//! 1. Every easing maps 0.0 → 0.0 and 1.0 → 1.0 and clamps its input.
//! 2. [`Tween::progress`] is 0.0 until the delay has passed and 1.0 once
//!    `delay + duration` has passed.
//! 3. A zero-duration tween completes the instant its delay passes.

use web_time::Duration;

/// An easing curve mapping linear progress in [0, 1] to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// Identity easing.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Cubic ease-out: fast start, gentle landing. Used for enter/exit motion.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Quadratic ease-in-out. Used when an on-screen element moves or morphs.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// A single eased transition with an optional start delay.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    delay: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// A linear tween with no delay.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            duration,
            easing: linear,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Set the start delay (builder pattern).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    /// Eased progress after `elapsed` since the tween was started.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() || active >= self.duration {
            return 1.0;
        }
        (self.easing)(active.as_secs_f32() / self.duration.as_secs_f32())
    }

    #[must_use]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.total()
    }
}
