use actix_web::{HttpResponse, Responder, web};

use super::{RejectBody, ReviewModeQuery, list_kind, review_kind};
use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::request::RequestKind;
use crate::service::{
    clock::SystemClock,
    request_flow::{self, Decision, LeaveSubmission, RequestListQuery},
};
use crate::store::{HrStore, mysql::MySqlStore};

/// Active leave types for the request form
#[utoipa::path(
    get,
    path = "/api/leave/types",
    responses(
        (status = 200, description = "Ordered by sort order", body = [crate::model::leave_type::LeaveType]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_types(
    _auth: AuthUser,
    store: web::Data<MySqlStore>,
) -> actix_web::Result<impl Responder> {
    let types = store.list_leave_types().await.map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(types))
}

/// Submit a leave or business-trip request
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveSubmission,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted as PENDING", body = Object, example = json!({
            "kind": "leave",
            "id": 12,
            "employee_id": 1000,
            "leave_type_id": 1,
            "hours": 8.0,
            "status": "PENDING"
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    payload: web::Json<LeaveSubmission>,
) -> actix_web::Result<impl Responder> {
    let request =
        request_flow::submit_leave(store.get_ref(), clock.get_ref(), &auth, payload.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(request))
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/api/leave",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Newest first", body = Object, example = json!({
            "total": 1,
            "data": [{ "kind": "leave", "id": 12, "employee_id": 1000, "status": "PENDING" }]
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin mode requires HR or Admin")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<RequestListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(list_kind(&auth, store.get_ref(), RequestKind::Leave, query.into_inner()).await?)
}

/// Approve a leave request
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve"),
        ReviewModeQuery
    ),
    responses(
        (status = 200, description = "Leave approved"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found or not a direct report's"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    path: web::Path<u64>,
    query: web::Query<ReviewModeQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(review_kind(
        &auth,
        store.get_ref(),
        clock.get_ref(),
        RequestKind::Leave,
        path.into_inner(),
        query.mode,
        Decision::Approve,
    )
    .await?)
}

/// Reject a leave request; the comment is optional
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject"),
        ReviewModeQuery
    ),
    request_body(content = RejectBody, description = "Optional review comment", content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found or not a direct report's"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    path: web::Path<u64>,
    query: web::Query<ReviewModeQuery>,
    body: Option<web::Json<RejectBody>>,
) -> actix_web::Result<impl Responder> {
    let comment = body.and_then(|b| b.into_inner().comment);
    Ok(review_kind(
        &auth,
        store.get_ref(),
        clock.get_ref(),
        RequestKind::Leave,
        path.into_inner(),
        query.mode,
        Decision::Reject { comment },
    )
    .await?)
}
