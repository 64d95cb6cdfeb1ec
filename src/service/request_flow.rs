//! Submission, listing and review of leave, makeup-attendance and car-usage
//! requests. Every kind moves PENDING -> APPROVED or PENDING -> REJECTED and
//! never back.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use super::{
    clock::{self, Clock},
    time_accounting::leave_request_hours,
};
use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult, StoreError};
use crate::model::{
    attendance::{AttendanceLog, CheckType, NewAttendanceLog},
    car::{CarStatus, NewCarUsageRequest},
    leave_request::NewLeaveRequest,
    makeup_request::NewMakeupRequest,
    request::{RequestFilter, RequestKind, RequestStatus, Review, ReviewableRequest},
};
use crate::store::HrStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// The caller's own requests.
    Mine,
    /// Requests of the caller's direct reports.
    #[default]
    Supervisor,
    /// Every request in the company; admin and HR only.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    Own(u64),
    DirectReports(u64),
    Company,
}

impl AccessScope {
    pub fn resolve(auth: &AuthUser, mode: ListMode) -> AppResult<Self> {
        match mode {
            ListMode::Admin => {
                auth.require_hr_or_admin()?;
                Ok(AccessScope::Company)
            }
            ListMode::Supervisor => Ok(AccessScope::DirectReports(auth.require_employee()?)),
            ListMode::Mine => Ok(AccessScope::Own(auth.require_employee()?)),
        }
    }

    fn filter(&self, status: Option<RequestStatus>) -> RequestFilter {
        match *self {
            AccessScope::Own(employee_id) => RequestFilter {
                employee_id: Some(employee_id),
                status,
                ..Default::default()
            },
            AccessScope::DirectReports(manager_id) => RequestFilter {
                manager_id: Some(manager_id),
                status,
                ..Default::default()
            },
            AccessScope::Company => RequestFilter {
                status,
                ..Default::default()
            },
        }
    }
}

/// Status filter as accepted on list endpoints; `ALL` disables it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFilter {
    Pending,
    Approved,
    Rejected,
    #[default]
    All,
}

impl StatusFilter {
    pub fn status(&self) -> Option<RequestStatus> {
        match self {
            StatusFilter::Pending => Some(RequestStatus::Pending),
            StatusFilter::Approved => Some(RequestStatus::Approved),
            StatusFilter::Rejected => Some(RequestStatus::Rejected),
            StatusFilter::All => None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RequestListQuery {
    /// mine | supervisor | admin
    pub mode: Option<ListMode>,
    /// PENDING | APPROVED | REJECTED | ALL
    pub status: Option<StatusFilter>,
}

pub async fn list_requests<S>(
    store: &S,
    scope: AccessScope,
    kind: RequestKind,
    status: Option<RequestStatus>,
) -> AppResult<Vec<ReviewableRequest>>
where
    S: HrStore + ?Sized,
{
    Ok(store.list_requests(kind, &scope.filter(status)).await?)
}

fn required_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end <= start {
        return Err(AppError::validation("end must be after start"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveSubmission {
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2026-01-05T09:00:00+08:00", format = "date-time", value_type = String)]
    pub start_at: DateTime<Utc>,
    #[schema(example = "2026-01-05T18:00:00+08:00", format = "date-time", value_type = String)]
    pub end_at: DateTime<Utc>,
    #[schema(example = "Client visit in Taichung")]
    pub reason: String,
    /// Reserve a vehicle together with a business trip.
    pub car_id: Option<u64>,
}

pub async fn submit_leave<S>(
    store: &S,
    clock: &dyn Clock,
    auth: &AuthUser,
    submission: LeaveSubmission,
) -> AppResult<ReviewableRequest>
where
    S: HrStore + ?Sized,
{
    let employee_id = auth.require_employee()?;
    let reason = required_text(&submission.reason, "reason")?;
    ordered(submission.start_at, submission.end_at)?;

    match store.get_leave_type(submission.leave_type_id).await? {
        Some(t) if t.is_active => {}
        _ => return Err(AppError::validation("unknown leave type")),
    }

    if let Some(car_id) = submission.car_id {
        match store.get_car(car_id).await? {
            Some(car) if car.is_active => {}
            _ => return Err(AppError::validation("unknown car")),
        }
    }

    let hours = leave_request_hours(
        clock.to_local(submission.start_at),
        clock.to_local(submission.end_at),
    );

    let request = store
        .insert_leave_request(NewLeaveRequest {
            employee_id,
            leave_type_id: submission.leave_type_id,
            start_at: submission.start_at,
            end_at: submission.end_at,
            reason,
            hours,
            car_id: submission.car_id,
        })
        .await?;

    info!(
        employee_id,
        user_id = auth.user_id,
        username = %auth.username,
        request_id = request.id(),
        hours,
        "Leave request submitted"
    );
    Ok(request)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MakeupSubmission {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub request_date: NaiveDate,
    #[schema(example = "08:55:00", format = "time", value_type = String)]
    pub request_time: NaiveTime,
    pub check_type: CheckType,
    #[schema(example = "Forgot to clock in")]
    pub reason: String,
}

pub async fn submit_makeup<S>(
    store: &S,
    clock: &dyn Clock,
    auth: &AuthUser,
    submission: MakeupSubmission,
) -> AppResult<ReviewableRequest>
where
    S: HrStore + ?Sized,
{
    let employee_id = auth.require_employee()?;
    let reason = required_text(&submission.reason, "reason")?;
    clock::check_date(submission.request_date)?;

    let requested = submission.request_date.and_time(submission.request_time);
    if requested > clock.to_local(clock.now()) {
        return Err(AppError::validation("makeup punches cannot be in the future"));
    }

    let request = store
        .insert_makeup_request(NewMakeupRequest {
            employee_id,
            request_date: submission.request_date,
            request_time: submission.request_time,
            check_type: submission.check_type,
            reason,
        })
        .await?;

    info!(
        employee_id,
        user_id = auth.user_id,
        username = %auth.username,
        request_id = request.id(),
        "Makeup request submitted"
    );
    Ok(request)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CarUsageSubmission {
    #[schema(example = 3)]
    pub car_id: u64,
    #[schema(format = "date-time", value_type = String)]
    pub start_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String)]
    pub end_at: DateTime<Utc>,
    #[schema(example = "Site inspection")]
    pub purpose: String,
}

/// Overlapping reservations of the same car are not detected.
pub async fn submit_car_usage<S>(
    store: &S,
    auth: &AuthUser,
    submission: CarUsageSubmission,
) -> AppResult<ReviewableRequest>
where
    S: HrStore + ?Sized,
{
    let employee_id = auth.require_employee()?;
    let purpose = required_text(&submission.purpose, "purpose")?;
    ordered(submission.start_at, submission.end_at)?;

    match store.get_car(submission.car_id).await? {
        Some(car) if car.is_active => {}
        _ => return Err(AppError::validation("unknown car")),
    }

    let request = store
        .insert_car_request(NewCarUsageRequest {
            employee_id,
            car_id: submission.car_id,
            start_at: submission.start_at,
            end_at: submission.end_at,
            purpose,
        })
        .await?;

    info!(
        employee_id,
        user_id = auth.user_id,
        username = %auth.username,
        request_id = request.id(),
        "Car usage request submitted"
    );
    Ok(request)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject { comment: Option<String> },
}

#[derive(Debug, Serialize)]
pub struct ReviewOutcome {
    pub request: ReviewableRequest,
    /// Punch synthesized by an approved makeup request.
    pub punch: Option<AttendanceLog>,
}

async fn visible_in<S>(store: &S, scope: AccessScope, request: &ReviewableRequest) -> AppResult<bool>
where
    S: HrStore + ?Sized,
{
    Ok(match scope {
        AccessScope::Company => true,
        AccessScope::Own(employee_id) => request.employee_id() == employee_id,
        AccessScope::DirectReports(manager_id) => store
            .get_employee(request.employee_id())
            .await?
            .is_some_and(|e| e.reports_to(manager_id)),
    })
}

/// Moves a pending request to a terminal state.
///
/// Requests outside `scope` are reported as not found, the same way they are
/// left out of listings. Approving a makeup request writes its punch in the
/// same transaction; approving a car request marks the car in use on a
/// best-effort basis.
pub async fn review_request<S>(
    store: &S,
    clock: &dyn Clock,
    auth: &AuthUser,
    scope: AccessScope,
    kind: RequestKind,
    request_id: u64,
    decision: Decision,
) -> AppResult<ReviewOutcome>
where
    S: HrStore + ?Sized,
{
    if matches!(scope, AccessScope::Own(_)) {
        return Err(AppError::Forbidden("requests cannot be reviewed in mine mode".into()));
    }
    let reviewer_id = auth.require_employee()?;

    let request = store
        .get_request(kind, request_id)
        .await?
        .ok_or_else(|| AppError::not_found(kind.as_ref(), request_id))?;

    if !visible_in(store, scope, &request).await? {
        return Err(AppError::not_found(kind.as_ref(), request_id));
    }

    if request.status().is_terminal() {
        return Err(AppError::AlreadyProcessed);
    }

    let (status, comment) = match decision {
        Decision::Approve => (RequestStatus::Approved, None),
        Decision::Reject { comment } => {
            let comment = comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
            if comment.is_none() && kind.requires_rejection_comment() {
                return Err(AppError::validation("a comment is required to reject this request"));
            }
            (RequestStatus::Rejected, comment)
        }
    };

    let review = Review {
        status,
        reviewer_id,
        reviewed_at: clock.now(),
        comment,
    };

    let punch = match (&request, status) {
        (ReviewableRequest::Makeup(makeup), RequestStatus::Approved) => {
            let punch = NewAttendanceLog {
                employee_id: makeup.employee_id,
                check_type: makeup.check_type,
                checked_at: clock::local_instant(
                    clock,
                    makeup.request_date.and_time(makeup.request_time),
                )?,
                reading: None,
                geofence: None,
                is_makeup: true,
            };
            let log = store
                .approve_makeup_with_punch(request_id, &review, punch)
                .await?
                .ok_or(AppError::AlreadyProcessed)?;
            Some(log)
        }
        _ => {
            if !store.finalize_request(kind, request_id, &review).await? {
                return Err(AppError::AlreadyProcessed);
            }
            None
        }
    };

    if let (ReviewableRequest::CarUsage(car_request), RequestStatus::Approved) = (&request, status) {
        if let Err(e) = store.set_car_status(car_request.car_id, CarStatus::InUse).await {
            warn!(error = %e, car_id = car_request.car_id, request_id, "Failed to mark car in use");
        }
    }

    info!(
        %kind,
        request_id,
        reviewer_id,
        user_id = auth.user_id,
        username = %auth.username,
        %status,
        "Request reviewed"
    );

    let request = store.get_request(kind, request_id).await?.ok_or_else(|| {
        StoreError::Inconsistent(format!("{} {} missing after review", kind, request_id))
    })?;

    Ok(ReviewOutcome { request, punch })
}
