//! Monotonic clock adapter.
//!
//! The scheduler runs on a caller-supplied millisecond count; this adapter
//! supplies it from `std::time::Instant` for the host binary.  Tests use
//! plain integers instead.

use std::time::{Duration, Instant};

/// Milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since start (monotonic).
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// How long to sleep until `deadline_ms`; zero if it already passed.
    pub fn until(&self, deadline_ms: u64) -> Duration {
        Duration::from_millis(deadline_ms.saturating_sub(self.uptime_ms()))
    }
}
