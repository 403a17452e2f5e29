//! Time helpers for minute-granularity scheduling.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

/// Local wall-clock time used for schedule evaluation.
pub type LocalTime = NaiveDateTime;

/// Return the current local time.
#[must_use]
pub fn now() -> LocalTime {
    Local::now().naive_local()
}

/// Day of week with Monday as `0` and Sunday as `6`, independent of locale.
#[must_use]
pub fn weekday_index(time: &LocalTime) -> u8 {
    // num_days_from_monday is always in 0..7
    u8::try_from(time.weekday().num_days_from_monday()).unwrap_or(0)
}

/// Identifies a single calendar minute, used to run schedules at most once per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinuteKey {
    date: chrono::NaiveDate,
    hour: u32,
    minute: u32,
}

impl MinuteKey {
    #[must_use]
    pub fn of(time: &LocalTime) -> Self {
        Self {
            date: time.date(),
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

/// Seconds to wait so that the next wake-up lands just after the next minute boundary.
#[must_use]
pub fn seconds_until_next_minute(time: &LocalTime) -> u64 {
    60 - u64::from(time.second().min(59)) + 1
}
