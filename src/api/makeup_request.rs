use actix_web::{HttpResponse, Responder, web};

use super::{RejectBody, ReviewModeQuery, list_kind, review_kind};
use crate::auth::auth::AuthUser;
use crate::model::request::RequestKind;
use crate::service::{
    clock::SystemClock,
    request_flow::{self, Decision, MakeupSubmission, RequestListQuery},
};
use crate::store::mysql::MySqlStore;

/// Request a missed punch to be added
#[utoipa::path(
    post,
    path = "/api/makeup",
    request_body(
        content = MakeupSubmission,
        description = "Date, time and direction of the missed punch",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Makeup request submitted as PENDING"),
        (status = 400, description = "Missing reason or requested time in the future"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Makeup"
)]
pub async fn create_makeup(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    payload: web::Json<MakeupSubmission>,
) -> actix_web::Result<impl Responder> {
    let request =
        request_flow::submit_makeup(store.get_ref(), clock.get_ref(), &auth, payload.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(request))
}

/// List makeup requests
#[utoipa::path(
    get,
    path = "/api/makeup",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Newest first"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin mode requires HR or Admin")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Makeup"
)]
pub async fn makeup_list(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<RequestListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(list_kind(&auth, store.get_ref(), RequestKind::Makeup, query.into_inner()).await?)
}

/// Approve a makeup request and record its punch
#[utoipa::path(
    put,
    path = "/api/makeup/{makeup_id}/approve",
    params(
        ("makeup_id" = u64, Path, description = "ID of the makeup request to approve"),
        ReviewModeQuery
    ),
    responses(
        (status = 200, description = "Request approved; the response carries the new punch", body = Object, example = json!({
            "request": { "kind": "makeup", "id": 4, "status": "APPROVED" },
            "punch": { "id": 981, "employee_id": 1000, "check_type": "IN", "checked_at": "2026-01-05T00:55:00Z", "is_makeup": true }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Makeup request not found or not a direct report's"),
        (status = 409, description = "Makeup request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Makeup"
)]
pub async fn approve_makeup(
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
        RequestKind::Makeup,
        path.into_inner(),
        query.mode,
        Decision::Approve,
    )
    .await?)
}

/// Reject a makeup request; a comment is required
#[utoipa::path(
    put,
    path = "/api/makeup/{makeup_id}/reject",
    params(
        ("makeup_id" = u64, Path, description = "ID of the makeup request to reject"),
        ReviewModeQuery
    ),
    request_body(content = RejectBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Makeup request rejected"),
        (status = 400, description = "Comment missing", body = Object, example = json!({
            "error": "VALIDATION_ERROR",
            "message": "a comment is required to reject this request"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Makeup request not found or not a direct report's"),
        (status = 409, description = "Makeup request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Makeup"
)]
pub async fn reject_makeup(
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
        RequestKind::Makeup,
        path.into_inner(),
        query.mode,
        Decision::Reject { comment },
    )
    .await?)
}
