//! Time sources for render tracking and diagnostics.
//!
//! Every timestamp in renderscope is a millisecond reading from a [`Clock`].
//! Production code uses [`SystemClock`]; tests and trace replay drive a
//! [`ManualClock`] so that nothing ever has to sleep in real time.

use parking_lot::Mutex;
use std::time::Instant;

/// Monotonic millisecond clock.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`], with its origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Mutex<f64>,
}

impl ManualClock {
    /// Create a clock reading 0ms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `start_ms`.
    #[must_use]
    pub fn starting_at(start_ms: f64) -> Self {
        Self {
            now_ms: Mutex::new(start_ms),
        }
    }

    /// Move the clock forward by `delta_ms`. Negative deltas are ignored.
    pub fn advance(&self, delta_ms: f64) {
        if delta_ms > 0.0 {
            *self.now_ms.lock() += delta_ms;
        }
    }

    /// Set the clock to an absolute reading.
    pub fn set(&self, now_ms: f64) {
        *self.now_ms.lock() = now_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::starting_at(100.0);
        clock.advance(5.0);
        clock.advance(2.5);
        assert_eq!(clock.now_ms(), 107.5);
    }

    #[test]
    fn test_manual_clock_ignores_negative_advance() {
        let clock = ManualClock::starting_at(10.0);
        clock.advance(-3.0);
        assert_eq!(clock.now_ms(), 10.0);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new();
        clock.set(42.0);
        assert_eq!(clock.now_ms(), 42.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
