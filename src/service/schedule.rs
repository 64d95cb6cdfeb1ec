use chrono::NaiveTime;

use crate::model::employee::Employee;

/// A break window with both ends configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Employee schedule with company defaults merged in, field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchedule {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub breaks: Vec<BreakWindow>,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

pub fn default_work_start() -> NaiveTime {
    hm(8, 0)
}

pub fn default_work_end() -> NaiveTime {
    hm(17, 0)
}

pub fn default_break() -> BreakWindow {
    BreakWindow {
        start: hm(12, 0),
        end: hm(13, 0),
    }
}

fn pair(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<BreakWindow> {
    match (start, end) {
        (Some(start), Some(end)) => Some(BreakWindow { start, end }),
        _ => None,
    }
}

impl ResolvedSchedule {
    /// The first break falls back to 12:00-13:00 per field. The second and
    /// third have no defaults and are dropped unless both ends are set.
    pub fn for_employee(employee: &Employee) -> Self {
        let lunch = default_break();
        let first = BreakWindow {
            start: employee.break1_start.unwrap_or(lunch.start),
            end: employee.break1_end.unwrap_or(lunch.end),
        };

        let mut breaks = vec![first];
        breaks.extend(pair(employee.break2_start, employee.break2_end));
        breaks.extend(pair(employee.break3_start, employee.break3_end));

        Self {
            work_start: employee.work_start.unwrap_or_else(default_work_start),
            work_end: employee.work_end.unwrap_or_else(default_work_end),
            breaks,
        }
    }
}

impl Default for ResolvedSchedule {
    fn default() -> Self {
        Self {
            work_start: default_work_start(),
            work_end: default_work_end(),
            breaks: vec![default_break()],
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::employee;
    use super::*;

    #[test]
    fn empty_schedule_resolves_to_company_defaults() {
        let resolved = ResolvedSchedule::for_employee(&employee(1, "111111", None));
        assert_eq!(resolved, ResolvedSchedule::default());
        assert_eq!(resolved.work_start, hm(8, 0));
        assert_eq!(resolved.work_end, hm(17, 0));
        assert_eq!(resolved.breaks, vec![default_break()]);
    }

    #[test]
    fn each_field_overrides_independently() {
        let mut e = employee(1, "111111", None);
        e.work_end = Some(hm(18, 30));
        e.break1_end = Some(hm(12, 30));

        let resolved = ResolvedSchedule::for_employee(&e);
        assert_eq!(resolved.work_start, hm(8, 0));
        assert_eq!(resolved.work_end, hm(18, 30));
        assert_eq!(
            resolved.breaks,
            vec![BreakWindow {
                start: hm(12, 0),
                end: hm(12, 30)
            }]
        );
    }

    #[test]
    fn half_configured_extra_breaks_are_skipped() {
        let mut e = employee(1, "111111", None);
        e.break2_start = Some(hm(15, 0));
        e.break3_start = Some(hm(10, 0));
        e.break3_end = Some(hm(10, 15));

        let resolved = ResolvedSchedule::for_employee(&e);
        assert_eq!(resolved.breaks.len(), 2);
        assert_eq!(resolved.breaks[1].start, hm(10, 0));
    }
}
