#![forbid(unsafe_code)]

//! Host time.
//!
//! Browsers hand out `DOMHighResTimeStamp` values (fractional milliseconds on
//! the `performance.now()` timeline). The engine works in [`Duration`], so the
//! conversion lives here together with a clock the host advances explicitly.

use std::time::Duration;

/// Convert a host timestamp in milliseconds into a [`Duration`].
///
/// Negative, NaN and infinite inputs map to [`Duration::ZERO`]; values too
/// large for a `u64` nanosecond count saturate.
#[must_use]
pub fn from_host_millis(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (ms * 1_000_000.0).round();
    if nanos >= u64::MAX as f64 {
        Duration::from_nanos(u64::MAX)
    } else {
        Duration::from_nanos(nanos as u64)
    }
}

/// Convert a [`Duration`] back into host milliseconds.
#[must_use]
pub fn to_host_millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt` and return the new time.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.now = self.now.saturating_add(dt);
        self.now
    }
}
