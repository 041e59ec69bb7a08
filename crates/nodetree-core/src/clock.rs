//! Time sources for node timestamps.

use std::cell::Cell;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Supplies the current time to a tree.
pub trait Clock {
    /// Current time, used for `created`/`modified` stamps.
    fn now(&self) -> SystemTime;
}

/// Wall clock with whole-second resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        let now = SystemTime::now();
        match now.duration_since(UNIX_EPOCH) {
            Ok(since) => UNIX_EPOCH + Duration::from_secs(since.as_secs()),
            Err(_) => now,
        }
    }
}

/// Manually driven clock for deterministic timestamps.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<SystemTime>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Create a clock frozen `secs` seconds after the Unix epoch.
    pub fn at_unix(secs: u64) -> Self {
        Self::new(UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Move the clock to an explicit time.
    pub fn set(&self, now: SystemTime) {
        self.now.set(now);
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}
