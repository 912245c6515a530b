//! Daily rollover rule for external-API usage counters.
//!
//! The search counter covers a trailing window anchored at a fixed wall-clock
//! hour in the operating timezone (17:00 KST by default), not a calendar day.
//! The generative counter is cumulative and never resets.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, Utc};

const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;
const DEFAULT_RESET_HOUR: u32 = 17;

/// Source of "now". Injected so the reset boundary is testable.
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

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    utc_offset: FixedOffset,
    reset_time: NaiveTime,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_HOURS, DEFAULT_RESET_HOUR).unwrap_or(Self {
            utc_offset: Utc.fix(),
            reset_time: NaiveTime::default(),
        })
    }
}

impl QuotaPolicy {
    /// Returns `None` if the offset is outside ±23h or the hour is not 0..=23.
    #[must_use]
    pub fn new(utc_offset_hours: i32, reset_hour: u32) -> Option<Self> {
        Some(Self {
            utc_offset: FixedOffset::east_opt(utc_offset_hours.checked_mul(3600)?)?,
            reset_time: NaiveTime::from_hms_opt(reset_hour, 0, 0)?,
        })
    }

    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// The most recent reset boundary at or before `now`.
    ///
    /// Today's boundary if local time has reached the reset hour, otherwise
    /// yesterday's.
    #[must_use]
    pub fn last_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_date = now.with_timezone(&self.utc_offset).date_naive();
        let local_boundary = local_date.and_time(self.reset_time);
        let offset = Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
        let today = (local_boundary - offset).and_utc();

        if now >= today {
            today
        } else {
            today - Duration::days(1)
        }
    }
}

/// Persisted usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaCounters {
    pub external_search_calls: i64,
    pub generative_calls: i64,
    pub last_reset_at: DateTime<Utc>,
}

impl QuotaCounters {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            external_search_calls: 0,
            generative_calls: 0,
            last_reset_at: now,
        }
    }

    /// `true` if the last reset happened before the current window started.
    #[must_use]
    pub fn needs_reset(&self, policy: &QuotaPolicy, now: DateTime<Utc>) -> bool {
        self.last_reset_at < policy.last_boundary(now)
    }

    /// Apply the rollover rule, then add the given charges.
    #[must_use]
    pub fn charge(
        self,
        policy: &QuotaPolicy,
        now: DateTime<Utc>,
        search_calls: i64,
        generative_calls: i64,
    ) -> Self {
        let mut next = self;
        if next.needs_reset(policy, now) {
            next.external_search_calls = 0;
            next.last_reset_at = now;
        }
        next.external_search_calls = next.external_search_calls.saturating_add(search_calls);
        next.generative_calls = next.generative_calls.saturating_add(generative_calls);
        next
    }
}
