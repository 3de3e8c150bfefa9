//! Deterministic clock for tests.

use chrono::{DateTime, TimeZone, Utc};
use kitchenquest_core::clock::Clock;

/// A clock stuck at one instant, so event and narration timestamps can be
/// asserted exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock pinned to 2026-01-15 10:00:00 UTC.
    ///
    /// # Panics
    ///
    /// Panics if the pinned instant is not a valid UTC time.
    #[must_use]
    pub fn pinned() -> Self {
        let instant = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0);
        Self(instant.single().unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
