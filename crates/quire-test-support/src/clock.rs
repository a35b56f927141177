//! A clock pinned to one instant, for reproducible timestamps.

use chrono::{DateTime, TimeZone, Utc};
use quire_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2026-01-15 10:00:00 UTC plus `micros` microseconds.
///
/// # Panics
///
/// Never in practice; the base date is a valid calendar date.
#[must_use]
pub fn fixed_time(micros: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap() + chrono::Duration::microseconds(micros)
}
