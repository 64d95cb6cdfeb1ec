use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::service::{
    clock::SystemClock,
    ledger,
    report::{self, ReportQuery, SummaryQuery},
    request_flow::AccessScope,
};
use crate::store::mysql::MySqlStore;

const DEFAULT_RECENT: u32 = 10;
const MAX_RECENT: u32 = 50;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentQuery {
    /// Number of punches to return (max 50)
    #[param(example = 10)]
    pub limit: Option<u32>,
}

/// Caller's own most recent punches
#[utoipa::path(
    get,
    path = "/api/attendance/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Punches, newest first", body = [crate::model::attendance::AttendanceLog]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn recent(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<RecentQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT).clamp(1, MAX_RECENT);

    let punches = ledger::recent_punches(store.get_ref(), employee_id, limit).await?;
    Ok(HttpResponse::Ok().json(punches))
}

/// Month calendar for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Every day of the month with punches, approved leave, hours and holidays", body = crate::service::report::MonthlyReport),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found or not visible to the caller")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn monthly_report(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(id) => id,
        None => auth.require_employee()?,
    };

    let report = report::monthly_report(
        store.get_ref(),
        clock.get_ref(),
        &auth,
        employee_id,
        query.year,
        query.month,
    )
    .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Month totals for a team
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "One row per active employee in scope", body = [crate::service::report::TeamSummaryRow]),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin mode requires HR or Admin")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn team_summary(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let scope = AccessScope::resolve(&auth, query.mode.unwrap_or_default())?;
    let rows =
        report::team_summary(store.get_ref(), clock.get_ref(), scope, query.year, query.month)
            .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Delete a punch (Admin)
#[utoipa::path(
    delete,
    path = "/api/attendance/{punch_id}",
    params(
        ("punch_id" = u64, Path, description = "ID of the punch to delete")
    ),
    responses(
        (status = 200, description = "Punch deleted", body = Object, example = json!({
            "message": "Punch deleted"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Punch not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn delete_punch(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let punch_id = path.into_inner();
    ledger::delete_punch(store.get_ref(), punch_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Punch deleted"
    })))
}
