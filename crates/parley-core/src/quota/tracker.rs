//! Per-user monthly usage counters with lazy period reset.
//!
//! Records live in a `DashMap` keyed by user. Every operation that touches a
//! record holds that key's shard lock for the whole read-reset-modify step,
//! which makes the reset and the increment atomic per user without
//! serializing unrelated users.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use dashmap::DashMap;

use parley_types::quota::{Period, QuotaLimits, QuotaRecord, Tier};
use parley_types::turn::UserId;

use super::tier::classify;
use crate::clock::{current_period, Clock, SystemClock};

/// Tracks how many turns each user has consumed in the current month.
#[derive(Debug)]
pub struct QuotaTracker {
    limits: QuotaLimits,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
    records: DashMap<UserId, QuotaRecord>,
}

impl QuotaTracker {
    /// Tracker on the system clock, with months measured in UTC.
    pub fn new(limits: QuotaLimits) -> Self {
        Self {
            limits,
            clock: Arc::new(SystemClock),
            offset: Utc.fix(),
            records: DashMap::new(),
        }
    }

    /// Replace the clock used to determine the current period.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Measure calendar months at `offset` instead of UTC.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// The period "now" falls in according to the injected clock.
    pub fn current_period(&self) -> Period {
        current_period(self.clock.now(), self.offset)
    }

    /// Classify the user's current usage, resetting a stale record first.
    ///
    /// Does not change the counter. Unknown users classify as a zero count
    /// and no record is created for them.
    pub fn check_and_classify(&self, user_id: &str) -> Tier {
        let period = self.current_period();
        let count = match self.records.get_mut(user_id) {
            Some(mut record) => {
                if record.period != period {
                    tracing::debug!(
                        user_id,
                        stale_period = %record.period,
                        period = %period,
                        "resetting quota for new period"
                    );
                    *record = QuotaRecord::fresh(period);
                }
                record.count
            }
            None => 0,
        };
        classify(count, &self.limits)
    }

    /// Charge one turn to the user's current-period counter.
    ///
    /// Saturates at `max_turns_per_month`. Returns the counter after the update.
    pub fn increment(&self, user_id: &str) -> u32 {
        let period = self.current_period();
        let max = self.limits.max_turns_per_month;

        let mut record = match self.records.get_mut(user_id) {
            Some(r) => r,
            None => self
                .records
                .entry(user_id.to_string())
                .or_insert_with(|| QuotaRecord::fresh(period)),
        };
        if record.period != period {
            *record = QuotaRecord::fresh(period);
        }
        if record.count < max {
            record.count += 1;
        }
        record.count
    }

    /// The user's record as seen in the current period.
    ///
    /// A missing or stale record reads as a fresh one; nothing is written.
    pub fn record(&self, user_id: &str) -> QuotaRecord {
        let period = self.current_period();
        self.records
            .get(user_id)
            .map(|r| *r.value())
            .filter(|r| r.period == period)
            .unwrap_or_else(|| QuotaRecord::fresh(period))
    }

    /// Number of users with a stored record.
    pub fn user_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn clock_at(year: i32, month: u32, day: u32) -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        ))
    }

    fn tracker(clock: Arc<ManualClock>) -> QuotaTracker {
        QuotaTracker::new(QuotaLimits::default()).with_clock(clock)
    }

    #[test]
    fn unknown_user_is_normal_and_not_stored() {
        let quota = tracker(clock_at(2025, 7, 1));
        assert_eq!(quota.check_and_classify("new"), Tier::Normal);
        assert_eq!(quota.user_count(), 0);
        assert_eq!(quota.record("new").count, 0);
    }

    #[test]
    fn increment_walks_through_tiers() {
        let quota = tracker(clock_at(2025, 7, 1));
        let mut seen = Vec::new();
        for _ in 0..30 {
            seen.push(quota.check_and_classify("u"));
            quota.increment("u");
        }
        assert!(seen[..15].iter().all(|t| *t == Tier::Normal));
        assert!(seen[15..25].iter().all(|t| *t == Tier::Warning));
        assert!(seen[25..30].iter().all(|t| *t == Tier::Exhausted));
        assert_eq!(quota.check_and_classify("u"), Tier::Blocked);
        assert_eq!(quota.record("u").count, 30);
    }

    #[test]
    fn increment_saturates_at_cap() {
        let quota = tracker(clock_at(2025, 7, 1));
        for _ in 0..35 {
            quota.increment("u");
        }
        assert_eq!(quota.record("u").count, 30);
        assert_eq!(quota.increment("u"), 30);
    }

    #[test]
    fn new_month_resets_stale_record() {
        let clock = clock_at(2025, 6, 15);
        let quota = tracker(Arc::clone(&clock));
        for _ in 0..10 {
            quota.increment("bob");
        }
        assert_eq!(quota.record("bob").period.to_string(), "2025-06");
        assert_eq!(quota.record("bob").count, 10);

        clock.set(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(quota.check_and_classify("bob"), Tier::Normal);

        let record = quota.record("bob");
        assert_eq!(record.count, 0);
        assert_eq!(record.period.to_string(), "2025-07");
    }

    #[test]
    fn blocked_user_is_unblocked_next_month() {
        let clock = clock_at(2025, 12, 31);
        let quota = tracker(Arc::clone(&clock));
        for _ in 0..30 {
            quota.increment("u");
        }
        assert_eq!(quota.check_and_classify("u"), Tier::Blocked);

        clock.advance(chrono::Duration::days(1));
        assert_eq!(quota.current_period().to_string(), "2026-01");
        assert_eq!(quota.check_and_classify("u"), Tier::Normal);
        assert_eq!(quota.increment("u"), 1);
    }

    #[test]
    fn increment_resets_stale_record_before_counting() {
        let clock = clock_at(2025, 6, 15);
        let quota = tracker(Arc::clone(&clock));
        for _ in 0..20 {
            quota.increment("u");
        }
        clock.set(Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap());
        assert_eq!(quota.increment("u"), 1);
    }

    #[test]
    fn record_does_not_write_reset() {
        let clock = clock_at(2025, 6, 15);
        let quota = tracker(Arc::clone(&clock));
        quota.increment("u");
        clock.set(Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap());
        assert_eq!(quota.record("u").count, 0);

        // Returning to June still sees the untouched June record.
        clock.set(Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap());
        assert_eq!(quota.record("u").count, 1);
    }

    #[test]
    fn utc_offset_moves_the_month_boundary() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 30, 16, 0, 0).unwrap(),
        ));
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let quota = QuotaTracker::new(QuotaLimits::default())
            .with_clock(clock)
            .with_utc_offset(tokyo);
        assert_eq!(quota.current_period().to_string(), "2025-07");
    }

    fn unlimited() -> QuotaLimits {
        QuotaLimits {
            max_turns_per_month: u32::MAX,
            warning_threshold: None,
            exhausted_threshold: None,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        const TASKS: usize = 64;
        const PER_TASK: u32 = 500;

        let quota = Arc::new(QuotaTracker::new(unlimited()).with_clock(clock_at(2025, 7, 1)));
        let barrier = Arc::new(tokio::sync::Barrier::new(TASKS));

        let mut handles = Vec::new();
        for _ in 0..TASKS {
            let quota = Arc::clone(&quota);
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                for _ in 0..PER_TASK {
                    assert_eq!(quota.check_and_classify("hot"), Tier::Normal);
                    quota.increment("hot");
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(quota.record("hot").count, TASKS as u32 * PER_TASK);
    }

    #[test]
    fn increments_from_os_threads_are_not_lost() {
        const THREADS: u32 = 8;
        const PER_THREAD: u32 = 2_000;

        let quota = QuotaTracker::new(unlimited()).with_clock(clock_at(2025, 7, 1));
        let barrier = std::sync::Barrier::new(THREADS as usize);

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    barrier.wait();
                    for _ in 0..PER_THREAD {
                        quota.increment("hot");
                    }
                });
            }
        });

        assert_eq!(quota.record("hot").count, THREADS * PER_THREAD);
        assert_eq!(quota.user_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_users_are_independent() {
        let quota = Arc::new(tracker(clock_at(2025, 7, 1)));
        let mut handles = Vec::new();
        for u in 0..20 {
            for _ in 0..5 {
                let quota = Arc::clone(&quota);
                handles.push(tokio::spawn(async move {
                    quota.increment(&format!("user-{u}"));
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(quota.user_count(), 20);
        for u in 0..20 {
            assert_eq!(quota.record(&format!("user-{u}")).count, 5);
        }
    }
}
