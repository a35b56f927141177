//! Time source for message creation.
//!
//! Persisted timestamps carry microsecond precision, so messages take their
//! `created_at` from [`Clock::now_micros`] rather than from the raw clock.

use chrono::{DateTime, SubsecRound, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time truncated to whole microseconds.
    fn now_micros(&self) -> DateTime<Utc> {
        truncate_to_micros(self.now())
    }
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Drops sub-microsecond digits from a timestamp.
#[must_use]
pub fn truncate_to_micros(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}
