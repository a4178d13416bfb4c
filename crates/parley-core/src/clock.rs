//! Injectable wall clock used to decide the current quota period.

use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};

use parley_types::quota::Period;

/// Source of "now". Production uses [`SystemClock`]; tests pin time with
/// [`ManualClock`].
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    at: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: RwLock::new(at) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.at.write().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut at = self.at.write().unwrap_or_else(|e| e.into_inner());
        *at += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.at.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// The calendar month `now` falls in when observed at `offset`.
pub fn current_period(now: DateTime<Utc>, offset: FixedOffset) -> Period {
    Period::from_datetime(&now.with_timezone(&offset))
}

/// Build a [`FixedOffset`] from minutes east of UTC, clamping to the valid range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    let secs = minutes.saturating_mul(60).clamp(-86_399, 86_399);
    FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
}
