//! Wall-clock access for the snapshot store
//!
//! The projector never reads the clock itself. The store asks its `Clock` for
//! the computation timestamp and derives the `as_of_year` used to flag
//! historical records, so tests can pin both.

use chrono::{DateTime, Datelike, Utc};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar year of `now()`, used as the real/projected boundary
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on January 1st of `year`, or `None` outside chrono's range
    pub fn at_year(year: i32) -> Option<Self> {
        chrono::NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Self(dt.and_utc()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
