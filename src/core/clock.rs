//! core::clock
//!
//! Injected source of "now".
//!
//! Lock expiry and publication timestamps read the current time through a
//! [`Clock`] so that tests can move time forward deterministically instead of
//! sleeping past a TTL.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::core::types::UtcTimestamp;

/// A source of the current UTC time.
pub trait Clock: Send + Sync {
    /// The current moment.
    fn now(&self) -> UtcTimestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcTimestamp {
        UtcTimestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// # Example
///
/// ```
/// use folio::core::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(11));
/// assert!(clock.now() > start);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<UtcTimestamp>,
}

impl ManualClock {
    /// Create a clock frozen at the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(UtcTimestamp::now())
    }

    /// Create a clock frozen at `start`.
    pub fn starting_at(start: UtcTimestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.clone() + by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UtcTimestamp {
        self.now
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
