use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{AppError, AppResult};

/// Calendar years accepted wherever a local date comes from a caller.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1970..=9999;

/// Supplies the current instant and the offset that defines a local calendar day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn offset(&self) -> FixedOffset;

    fn to_local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.offset()).naive_local()
    }

    /// `None` when the shifted instant falls outside chrono's range.
    fn from_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let offset = Duration::seconds(i64::from(self.offset().local_minus_utc()));
        local
            .checked_sub_signed(offset)
            .map(|utc| Utc.from_utc_datetime(&utc))
    }
}

pub fn check_year(year: i32) -> AppResult<()> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "year must be between {} and {}",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )))
    }
}

pub fn check_date(date: NaiveDate) -> AppResult<()> {
    check_year(date.year())
}

/// The UTC instant of a local wall-clock time, as a validation error when
/// it cannot be represented.
pub fn local_instant(clock: &dyn Clock, local: NaiveDateTime) -> AppResult<DateTime<Utc>> {
    clock
        .from_local(local)
        .ok_or_else(|| AppError::validation(format!("local time {} is out of range", local)))
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixedClock;
    use super::*;

    #[test]
    fn local_conversion_round_trips_through_the_offset() {
        let clock = FixedClock::at_local("2026-01-05 08:30");
        assert_eq!(clock.now().to_rfc3339(), "2026-01-05T00:30:00+00:00");
        assert_eq!(
            clock.to_local(clock.now()).format("%Y-%m-%d %H:%M").to_string(),
            "2026-01-05 08:30"
        );
    }

    #[test]
    fn unrepresentable_local_times_are_rejected() {
        let clock = FixedClock::at_local("2026-01-05 08:30");
        assert!(clock.from_local(NaiveDateTime::MIN).is_none());
        assert!(matches!(
            local_instant(&clock, NaiveDateTime::MIN),
            Err(AppError::Validation(_))
        ));

        assert!(check_year(2026).is_ok());
        assert!(check_year(NaiveDate::MIN.year()).is_err());
        assert!(check_date(NaiveDate::MAX).is_err());
    }
}
