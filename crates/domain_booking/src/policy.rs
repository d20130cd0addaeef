//! Booking rules that vary by deployment

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use core_kernel::{TemporalError, Timezone};

/// Default booking horizon, roughly three months
pub const DEFAULT_MAX_ADVANCE_DAYS: i64 = 92;

/// Booking rules applied by the booking service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Zone in which viewing dates and times are interpreted
    pub timezone: Timezone,
    /// How far ahead a viewing may be requested; `None` disables the limit
    pub max_advance: Option<Duration>,
    /// Reject status changes that do not follow the booking lifecycle
    pub enforce_transitions: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            timezone: Timezone::new(chrono_tz::Europe::Dublin),
            max_advance: Some(Duration::days(DEFAULT_MAX_ADVANCE_DAYS)),
            enforce_transitions: false,
        }
    }
}

impl BookingPolicy {
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_max_advance(mut self, max_advance: Option<Duration>) -> Self {
        self.max_advance = max_advance;
        self
    }

    pub fn with_enforced_transitions(mut self, enforce: bool) -> Self {
        self.enforce_transitions = enforce;
        self
    }

    /// The instant a viewing starts
    pub fn viewing_instant(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, TemporalError> {
        self.timezone.local_to_utc(date, time)
    }

    /// The latest instant that may still be booked, if any
    pub fn horizon(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.max_advance.map(|max| now + max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_policy() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.timezone.name(), "Europe/Dublin");
        assert_eq!(policy.max_advance, Some(Duration::days(92)));
        assert!(!policy.enforce_transitions);
    }

    #[test]
    fn test_viewing_instant_uses_policy_zone() {
        let policy = BookingPolicy::default();
        let instant = policy
            .viewing_instant(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_horizon_can_be_disabled() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        assert!(BookingPolicy::default().with_max_advance(None).horizon(now).is_none());
        assert_eq!(
            BookingPolicy::default().horizon(now),
            Some(Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap())
        );
    }
}
