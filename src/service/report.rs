//! Read-side month views: one employee's calendar and the team totals table.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{
    clock::{self, Clock},
    holiday,
    request_flow::{AccessScope, ListMode},
    schedule::ResolvedSchedule,
    time_accounting::{self, LocalPunch, round2},
};
use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::{
    attendance::{AttendanceLog, CheckType},
    employee::Employee,
    leave_request::LeaveRequest,
};
use crate::store::HrStore;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    pub employee_id: Option<u64>,
    #[param(example = 2026)]
    pub year: i32,
    #[param(example = 1)]
    pub month: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    pub year: i32,
    pub month: u32,
    /// supervisor | admin
    pub mode: Option<ListMode>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayReport {
    #[schema(value_type = String, format = "date", example = "2026-01-05")]
    pub date: NaiveDate,
    pub punches: Vec<AttendanceLog>,
    /// Approved leave covering any part of the day.
    pub leaves: Vec<LeaveRequest>,
    #[schema(example = 8.0)]
    pub worked_hours: f64,
    pub holiday_name: Option<String>,
    /// A weekend day worked in exchange for a bridged holiday.
    pub makeup_workday: bool,
    pub late: bool,
    pub left_early: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct MonthTotals {
    pub worked_hours: f64,
    /// Days with credited hours.
    pub worked_days: u32,
    pub leave_days: u32,
    pub late_days: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyReport {
    pub employee_id: u64,
    pub employee_name: String,
    pub year: i32,
    pub month: u32,
    /// Every calendar day of the month, keyed by ISO date.
    #[schema(value_type = Object)]
    pub days: BTreeMap<NaiveDate, DayReport>,
    pub totals: MonthTotals,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamSummaryRow {
    pub employee_id: u64,
    pub employee_name: String,
    pub department: Option<String>,
    #[serde(flatten)]
    pub totals: MonthTotals,
}

/// First day of the month and first day of the next one.
fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    clock::check_year(year)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("invalid month {}-{}", year, month)))?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| AppError::validation(format!("invalid month {}-{}", year, month)))?;
    Ok((first, next))
}

fn local_midnight(clock: &dyn Clock, date: NaiveDate) -> AppResult<DateTime<Utc>> {
    clock::local_instant(clock, date.and_time(NaiveTime::MIN))
}

fn totals<'a>(days: impl Iterator<Item = &'a DayReport>) -> MonthTotals {
    let mut totals = days.fold(MonthTotals::default(), |mut acc, day| {
        acc.worked_hours += day.worked_hours;
        acc.worked_days += u32::from(day.worked_hours > 0.0);
        acc.leave_days += u32::from(!day.leaves.is_empty());
        acc.late_days += u32::from(day.late);
        acc
    });
    totals.worked_hours = round2(totals.worked_hours);
    totals
}

async fn build_month<S>(
    store: &S,
    clock: &dyn Clock,
    employee: &Employee,
    year: i32,
    month: u32,
) -> AppResult<MonthlyReport>
where
    S: HrStore + ?Sized,
{
    let (first, next) = month_bounds(year, month)?;
    let from = local_midnight(clock, first)?;
    let to = local_midnight(clock, next)?;

    let punches = store.punches_between(employee.id, from, to).await?;
    let leaves = store.approved_leaves_between(employee.id, from, to).await?;
    let schedule = ResolvedSchedule::for_employee(employee);

    let mut by_day: BTreeMap<NaiveDate, Vec<AttendanceLog>> = BTreeMap::new();
    for punch in punches {
        by_day
            .entry(clock.to_local(punch.checked_at).date())
            .or_default()
            .push(punch);
    }

    let mut days = BTreeMap::new();
    for date in first.iter_days().take_while(|date| *date < next) {
        let punches = by_day.remove(&date).unwrap_or_default();
        let local: Vec<LocalPunch> = punches
            .iter()
            .map(|p| LocalPunch {
                check_type: p.check_type,
                at: clock.to_local(p.checked_at),
            })
            .collect();

        let day_start = local_midnight(clock, date)?;
        let day_end = day_start + Duration::days(1);
        let day_leaves = leaves
            .iter()
            .filter(|l| l.start_at < day_end && l.end_at > day_start)
            .cloned()
            .collect();

        let late = local
            .iter()
            .find(|p| p.check_type == CheckType::In)
            .is_some_and(|p| time_accounting::is_late(&schedule, p.at));
        let left_early = local
            .iter()
            .rev()
            .find(|p| p.check_type == CheckType::Out)
            .is_some_and(|p| time_accounting::left_early(&schedule, p.at));

        let day = DayReport {
            date,
            worked_hours: time_accounting::worked_hours(&schedule, &local),
            holiday_name: holiday::holiday_name(date).map(str::to_string),
            makeup_workday: holiday::is_makeup_workday(date),
            punches,
            leaves: day_leaves,
            late,
            left_early,
        };
        days.insert(date, day);
    }

    Ok(MonthlyReport {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        year,
        month,
        totals: totals(days.values()),
        days,
    })
}

/// Month calendar for one employee. Callers may view themselves, their
/// direct reports, or anyone when they hold company scope; any other
/// employee is reported as not found.
pub async fn monthly_report<S>(
    store: &S,
    clock: &dyn Clock,
    auth: &AuthUser,
    employee_id: u64,
    year: i32,
    month: u32,
) -> AppResult<MonthlyReport>
where
    S: HrStore + ?Sized,
{
    let employee = store
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::not_found("employee", employee_id))?;

    let allowed = auth.role.has_company_scope()
        || auth
            .employee_id
            .is_some_and(|me| me == employee_id || employee.reports_to(me));
    if !allowed {
        return Err(AppError::not_found("employee", employee_id));
    }

    build_month(store, clock, &employee, year, month).await
}

/// Per-employee month totals for every active employee in `scope`.
pub async fn team_summary<S>(
    store: &S,
    clock: &dyn Clock,
    scope: AccessScope,
    year: i32,
    month: u32,
) -> AppResult<Vec<TeamSummaryRow>>
where
    S: HrStore + ?Sized,
{
    month_bounds(year, month)?;

    let employees = match scope {
        AccessScope::Company => store.list_active_employees(None).await?,
        AccessScope::DirectReports(manager_id) => store.list_active_employees(Some(manager_id)).await?,
        AccessScope::Own(employee_id) => store.get_employee(employee_id).await?.into_iter().collect(),
    };

    let mut rows = Vec::with_capacity(employees.len());
    for employee in &employees {
        let report = build_month(store, clock, employee, year, month).await?;
        rows.push(TeamSummaryRow {
            employee_id: employee.id,
            employee_name: employee.name.clone(),
            department: employee.department.clone(),
            totals: report.totals,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDateTime};

    use super::*;
    use crate::model::{
        attendance::NewAttendanceLog,
        leave_request::NewLeaveRequest,
        request::{RequestKind, RequestStatus, Review},
        role::Role,
    };
    use crate::service::clock::testing::FixedClock;
    use crate::service::schedule::testing::employee;
    use crate::store::memory::MemoryStore;

    const BOSS: u64 = 1;
    const WORKER: u64 = 2;
    const STRANGER: u64 = 3;

    fn auth(employee_id: u64, role: Role) -> AuthUser {
        AuthUser {
            user_id: employee_id,
            username: format!("u{}", employee_id),
            role,
            employee_id: Some(employee_id),
        }
    }

    fn at(clock: &FixedClock, local: &str) -> DateTime<Utc> {
        clock
            .from_local(NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M").unwrap())
            .unwrap()
    }

    fn punch(store: &MemoryStore, clock: &FixedClock, employee_id: u64, check_type: CheckType, local: &str) {
        store.insert_punch(NewAttendanceLog {
            employee_id,
            check_type,
            checked_at: at(clock, local),
            reading: None,
            geofence: None,
            is_makeup: false,
        });
    }

    async fn approved_leave(store: &MemoryStore, clock: &FixedClock, start: &str, end: &str) {
        let id = store
            .insert_leave_request(NewLeaveRequest {
                employee_id: WORKER,
                leave_type_id: 1,
                start_at: at(clock, start),
                end_at: at(clock, end),
                reason: "Trip".into(),
                hours: 0.0,
                car_id: None,
            })
            .await
            .unwrap()
            .id();
        let review = Review {
            status: RequestStatus::Approved,
            reviewer_id: BOSS,
            reviewed_at: clock.now(),
            comment: None,
        };
        assert!(store.finalize_request(RequestKind::Leave, id, &review).await.unwrap());
    }

    async fn seeded(clock: &FixedClock) -> MemoryStore {
        let store = MemoryStore::new();
        store.add_employee(employee(BOSS, "100001", None));
        store.add_employee(employee(WORKER, "100002", Some(BOSS)));
        store.add_employee(employee(STRANGER, "100003", None));

        punch(&store, clock, WORKER, CheckType::In, "2026-01-05 08:25");
        punch(&store, clock, WORKER, CheckType::Out, "2026-01-05 17:10");
        punch(&store, clock, WORKER, CheckType::In, "2026-01-06 09:10");
        punch(&store, clock, WORKER, CheckType::Out, "2026-01-06 17:00");
        punch(&store, clock, WORKER, CheckType::In, "2026-01-31 23:30");
        punch(&store, clock, WORKER, CheckType::Out, "2026-02-01 00:10");
        approved_leave(&store, clock, "2026-01-07 09:00", "2026-01-08 18:00").await;
        store
    }

    fn day(report: &MonthlyReport, d: u32) -> &DayReport {
        &report.days[&NaiveDate::from_ymd_opt(2026, 1, d).unwrap()]
    }

    #[actix_web::test]
    async fn month_covers_every_day_with_hours_leave_and_holidays() {
        let clock = FixedClock::at_local("2026-02-10 12:00");
        let store = seeded(&clock).await;

        let report = monthly_report(&store, &clock, &auth(WORKER, Role::Employee), WORKER, 2026, 1)
            .await
            .unwrap();

        assert_eq!(report.days.len(), 31);
        assert_eq!(day(&report, 1).holiday_name.as_deref(), Some("New Year's Day"));

        let snapped = day(&report, 5);
        assert_eq!(snapped.worked_hours, 8.0);
        assert_eq!(snapped.punches.len(), 2);
        assert!(!snapped.late && !snapped.left_early);

        // 09:10 is outside the grace period, 17:00 is on time
        let tardy = day(&report, 6);
        assert_eq!(tardy.worked_hours, 6.83);
        assert!(tardy.late);
        assert!(!tardy.left_early);

        assert_eq!(day(&report, 7).leaves.len(), 1);
        assert_eq!(day(&report, 8).leaves.len(), 1);
        assert!(day(&report, 9).leaves.is_empty());

        // the OUT after local midnight belongs to February
        let last = day(&report, 31);
        assert_eq!(last.punches.len(), 1);
        assert_eq!(last.worked_hours, 0.0);

        assert_eq!(
            report.totals,
            MonthTotals {
                worked_hours: 14.83,
                worked_days: 2,
                leave_days: 2,
                late_days: 2,
            }
        );
    }

    #[actix_web::test]
    async fn report_visibility_follows_reporting_line() {
        let clock = FixedClock::at_local("2026-02-10 12:00");
        let store = seeded(&clock).await;

        assert!(monthly_report(&store, &clock, &auth(BOSS, Role::Employee), WORKER, 2026, 1).await.is_ok());
        assert!(monthly_report(&store, &clock, &auth(STRANGER, Role::Hr), WORKER, 2026, 1).await.is_ok());
        assert!(matches!(
            monthly_report(&store, &clock, &auth(STRANGER, Role::Employee), WORKER, 2026, 1).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            monthly_report(&store, &clock, &auth(WORKER, Role::Employee), WORKER, 2026, 13).await,
            Err(AppError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn out_of_range_years_are_rejected_before_any_lookup() {
        let clock = FixedClock::at_local("2026-02-10 12:00");
        let store = seeded(&clock).await;
        let hr = auth(STRANGER, Role::Hr);

        for year in [NaiveDate::MIN.year(), NaiveDate::MAX.year(), 1969, 10_000] {
            assert!(matches!(
                monthly_report(&store, &clock, &hr, WORKER, year, 1).await,
                Err(AppError::Validation(_))
            ));
            assert!(matches!(
                team_summary(&store, &clock, AccessScope::Company, year, 1).await,
                Err(AppError::Validation(_))
            ));
        }

        // December of the last supported year ends in the following one
        assert!(monthly_report(&store, &clock, &hr, WORKER, 9999, 12).await.is_ok());
    }

    #[actix_web::test]
    async fn team_summary_is_limited_to_scope() {
        let clock = FixedClock::at_local("2026-02-10 12:00");
        let store = seeded(&clock).await;

        let team = team_summary(&store, &clock, AccessScope::DirectReports(BOSS), 2026, 1)
            .await
            .unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].employee_id, WORKER);
        assert_eq!(team[0].totals.worked_days, 2);

        let company = team_summary(&store, &clock, AccessScope::Company, 2026, 1).await.unwrap();
        assert_eq!(company.len(), 3);
        assert!(company.iter().filter(|r| r.employee_id != WORKER).all(|r| r.totals == MonthTotals::default()));
    }
}
