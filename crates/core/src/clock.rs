//! Reference time for the standby operations.
//!
//! Both operations work on calendar dates. The allocator uses the current local
//! date; the pruner moves "now" back by the configured bias first, so runs close
//! to midnight keep the same window as the evening before.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// The date new standby directories are allocated for.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// The date the prune window is computed from.
    fn prune_reference_date(&self, bias: chrono::Duration) -> NaiveDate {
        (self.now() - bias).date()
    }
}

/// Wall-clock time in the local timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to a single instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }

    /// A clock pinned to midnight of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
