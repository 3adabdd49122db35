//! Smoothing between discrete progress samples.

use tokio::time::{Duration, Instant};

/// Shape of the interpolation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInOutCubic,
}

impl Easing {
    /// Map linear time `t` in `[0, 1]` onto eased progress in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Animates a value from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// A tween that sits at `value`.
    pub fn settled(value: f64, at: Instant) -> Self {
        Self::new(value, value, at, Duration::ZERO, Easing::Linear)
    }

    /// Value at instant `at`. Before the start this is `from`, after the
    /// end it is `to`.
    pub fn sample(&self, at: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = at.saturating_duration_since(self.start);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}
