//! Work-hour accounting.
//!
//! Two rules live here and are intentionally kept apart:
//! [`worked_hours`] turns one day's punches into credited hours using the
//! employee's schedule, grace-period snapping and every configured break,
//! while [`leave_request_hours`] estimates the length of a requested leave
//! from its bounds alone with a fixed 12:00-13:00 lunch window.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::schedule::ResolvedSchedule;
use crate::model::attendance::CheckType;

/// Tolerance, on either side, for snapping a punch to the scheduled time.
pub const GRACE_PERIOD_MINUTES: i64 = 30;

/// A punch expressed in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPunch {
    pub check_type: CheckType,
    pub at: NaiveDateTime,
}

fn grace() -> Duration {
    Duration::minutes(GRACE_PERIOD_MINUTES)
}

fn anchor(at: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    at.date().and_time(time)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> Duration {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start { end - start } else { Duration::zero() }
}

/// Replaces `actual` with the scheduled time (on the same day) when the two
/// are at most the grace period apart.
pub fn snap_to_schedule(actual: NaiveDateTime, scheduled: NaiveTime) -> NaiveDateTime {
    let target = anchor(actual, scheduled);
    let drift = if actual > target { actual - target } else { target - actual };
    if drift <= grace() { target } else { actual }
}

/// First IN and last OUT of a day. Needs at least two punches; a day
/// missing either side has no pair.
pub fn pair_punches(punches: &[LocalPunch]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if punches.len() < 2 {
        return None;
    }

    let check_in = punches.iter().find(|p| p.check_type == CheckType::In)?;
    let check_out = punches.iter().rev().find(|p| p.check_type == CheckType::Out)?;

    Some((check_in.at, check_out.at))
}

/// Credited hours for one day. `punches` must belong to a single local day
/// and be sorted ascending by time.
pub fn worked_hours(schedule: &ResolvedSchedule, punches: &[LocalPunch]) -> f64 {
    let Some((check_in, check_out)) = pair_punches(punches) else {
        return 0.0;
    };

    let effective_in = snap_to_schedule(check_in, schedule.work_start);
    let effective_out = snap_to_schedule(check_out, schedule.work_end);

    let gross = (effective_out - effective_in).max(Duration::zero());

    let on_breaks = schedule
        .breaks
        .iter()
        .map(|b| {
            overlap(
                effective_in,
                effective_out,
                anchor(effective_in, b.start),
                anchor(effective_in, b.end),
            )
        })
        .fold(Duration::zero(), |total, d| total + d);

    let net = (gross - on_breaks).max(Duration::zero());
    round2(net.num_seconds() as f64 / 3600.0)
}

/// Arrived after the grace period had elapsed.
pub fn is_late(schedule: &ResolvedSchedule, check_in: NaiveDateTime) -> bool {
    check_in > anchor(check_in, schedule.work_start) + grace()
}

/// Left before the grace period that precedes the scheduled end.
pub fn left_early(schedule: &ResolvedSchedule, check_out: NaiveDateTime) -> bool {
    check_out < anchor(check_out, schedule.work_end) - grace()
}

/// Requested leave length in hours: elapsed minutes minus the overlap with
/// 12:00-13:00 on every calendar day the interval touches.
pub fn leave_request_hours(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    if end <= start {
        return 0.0;
    }

    let lunch_start = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    let lunch_end = NaiveTime::from_hms_opt(13, 0, 0).unwrap_or(NaiveTime::MIN);

    let total_minutes = (end - start).num_minutes();
    let lunch_minutes: i64 = start
        .date()
        .iter_days()
        .take_while(|day| *day <= end.date())
        .map(|day| {
            overlap(start, end, day.and_time(lunch_start), day.and_time(lunch_end)).num_minutes()
        })
        .sum();

    (total_minutes - lunch_minutes).max(0) as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::schedule::BreakWindow;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn punch(check_type: CheckType, s: &str) -> LocalPunch {
        LocalPunch {
            check_type,
            at: at(&format!("2026-01-05 {}", s)),
        }
    }

    fn day(pairs: &[(CheckType, &str)]) -> Vec<LocalPunch> {
        pairs.iter().map(|(c, s)| punch(*c, s)).collect()
    }

    use CheckType::{In, Out};

    #[test]
    fn punches_inside_grace_snap_to_schedule() {
        let schedule = ResolvedSchedule::default();
        let hours = worked_hours(&schedule, &day(&[(In, "08:25"), (Out, "17:10")]));
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn short_morning_span_has_no_break_overlap() {
        let schedule = ResolvedSchedule::default();
        let hours = worked_hours(&schedule, &day(&[(In, "09:00"), (Out, "09:30")]));
        assert_eq!(hours, 0.5);
    }

    #[test]
    fn lone_or_unpaired_punches_earn_nothing() {
        let schedule = ResolvedSchedule::default();
        assert_eq!(worked_hours(&schedule, &day(&[(In, "08:00")])), 0.0);
        assert_eq!(worked_hours(&schedule, &day(&[(In, "08:00"), (In, "17:00")])), 0.0);
        assert_eq!(worked_hours(&schedule, &day(&[(Out, "08:00"), (Out, "17:00")])), 0.0);
        assert_eq!(worked_hours(&schedule, &[]), 0.0);
    }

    #[test]
    fn checkout_before_checkin_is_floored_at_zero() {
        let schedule = ResolvedSchedule::default();
        let hours = worked_hours(&schedule, &day(&[(Out, "10:00"), (In, "14:00")]));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn first_in_and_last_out_win_over_repeated_punches() {
        let schedule = ResolvedSchedule::default();
        let punches = day(&[
            (In, "09:00"),
            (In, "09:02"),
            (Out, "11:00"),
            (In, "11:10"),
            (Out, "15:00"),
        ]);
        // 09:00-15:00 minus the full lunch hour
        assert_eq!(worked_hours(&schedule, &punches), 5.0);
    }

    #[test]
    fn grace_boundary_is_inclusive() {
        let scheduled = t("08:00");
        assert_eq!(snap_to_schedule(at("2026-01-05 08:30"), scheduled), at("2026-01-05 08:00"));
        assert_eq!(snap_to_schedule(at("2026-01-05 07:30"), scheduled), at("2026-01-05 08:00"));
        assert_eq!(snap_to_schedule(at("2026-01-05 08:31"), scheduled), at("2026-01-05 08:31"));
        assert_eq!(snap_to_schedule(at("2026-01-05 07:29"), scheduled), at("2026-01-05 07:29"));
    }

    #[test]
    fn all_configured_breaks_are_deducted() {
        let schedule = ResolvedSchedule {
            work_start: t("09:00"),
            work_end: t("18:00"),
            breaks: vec![
                BreakWindow {
                    start: t("10:00"),
                    end: t("10:15"),
                },
                BreakWindow {
                    start: t("12:00"),
                    end: t("13:00"),
                },
                BreakWindow {
                    start: t("15:00"),
                    end: t("15:15"),
                },
            ],
        };
        let hours = worked_hours(&schedule, &day(&[(In, "09:05"), (Out, "18:20")]));
        assert_eq!(hours, 7.5);

        // leaving at 12:30 only overlaps half of lunch and the morning break
        let hours = worked_hours(&schedule, &day(&[(In, "09:00"), (Out, "12:30")]));
        assert_eq!(hours, 2.75);
    }

    #[test]
    fn worked_hours_round_to_two_decimals() {
        let schedule = ResolvedSchedule::default();
        // 09:00-10:41 is 101 minutes
        let hours = worked_hours(&schedule, &day(&[(In, "09:00"), (Out, "10:41")]));
        assert_eq!(hours, 1.68);
    }

    #[test]
    fn late_and_early_flags_respect_the_grace_period() {
        let schedule = ResolvedSchedule::default();
        assert!(!is_late(&schedule, at("2026-01-05 08:30")));
        assert!(is_late(&schedule, at("2026-01-05 08:31")));
        assert!(!left_early(&schedule, at("2026-01-05 16:30")));
        assert!(left_early(&schedule, at("2026-01-05 16:29")));
    }

    #[test]
    fn leave_hours_deduct_a_single_lunch_window() {
        assert_eq!(leave_request_hours(at("2025-01-01 09:00"), at("2025-01-01 18:00")), 8.0);
        assert_eq!(leave_request_hours(at("2025-01-01 13:00"), at("2025-01-01 17:00")), 4.0);
        assert_eq!(leave_request_hours(at("2025-01-01 12:30"), at("2025-01-01 14:00")), 1.0);
    }

    #[test]
    fn leave_hours_count_lunch_on_every_covered_day() {
        assert_eq!(leave_request_hours(at("2025-01-01 09:00"), at("2025-01-02 18:00")), 31.0);
    }

    #[test]
    fn leave_hours_ignore_schedule_grace() {
        // the daily engine would snap both ends to 08:00-17:00
        assert_eq!(leave_request_hours(at("2025-01-01 08:20"), at("2025-01-01 17:10")), 470.0 / 60.0);
    }

    #[test]
    fn empty_or_inverted_leave_is_zero() {
        assert_eq!(leave_request_hours(at("2025-01-01 09:00"), at("2025-01-01 09:00")), 0.0);
        assert_eq!(leave_request_hours(at("2025-01-01 18:00"), at("2025-01-01 09:00")), 0.0);
    }
}
