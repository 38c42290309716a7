// Count-up animation for headline numbers.
//
// Purely presentational: the value counts linearly from zero to the target
// over a fixed duration, then holds. The computed stats are never touched.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUp {
    target: f64,
    duration: Duration,
    started: Instant,
}

impl CountUp {
    pub fn new(target: f64, duration: Duration, started: Instant) -> Self {
        CountUp {
            target,
            duration,
            started,
        }
    }

    /// Fraction of the animation elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        self.progress_at(now) * self.target
    }

    /// Displayed text at `now`, always two decimals.
    pub fn display_at(&self, now: Instant) -> String {
        format!("{:.2}", self.value_at(now))
    }

    pub fn is_finished_at(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
