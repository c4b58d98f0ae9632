//! Time source abstraction for date-relative classification.
//!
//! The store fetches one instant per recompute pass and threads it through
//! every predicate, so the filtered list and stats of a single pass always
//! agree on what "now" means. Tests substitute a fixed clock to freeze
//! classification outcomes.

use chrono::{DateTime, Utc};

/// Provides the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the instant it was constructed with.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
