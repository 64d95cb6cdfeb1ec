use actix_web::{HttpResponse, Responder, web};

use super::{RejectBody, ReviewModeQuery, list_kind, review_kind};
use crate::auth::auth::AuthUser;
use crate::model::request::RequestKind;
use crate::service::{
    clock::SystemClock,
    request_flow::{self, CarUsageSubmission, Decision, RequestListQuery},
};
use crate::store::mysql::MySqlStore;

/// Reserve a company car
#[utoipa::path(
    post,
    path = "/api/car-requests",
    request_body(
        content = CarUsageSubmission,
        description = "Car, period and purpose",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Car usage request submitted as PENDING"),
        (status = 400, description = "Unknown car, missing purpose or end before start"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Car"
)]
pub async fn create_car_request(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    payload: web::Json<CarUsageSubmission>,
) -> actix_web::Result<impl Responder> {
    let request = request_flow::submit_car_usage(store.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(request))
}

/// List car usage requests
#[utoipa::path(
    get,
    path = "/api/car-requests",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Newest first"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin mode requires HR or Admin")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Car"
)]
pub async fn car_request_list(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<RequestListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(list_kind(&auth, store.get_ref(), RequestKind::CarUsage, query.into_inner()).await?)
}

/// Approve a car usage request and mark the car in use
#[utoipa::path(
    put,
    path = "/api/car-requests/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the car usage request to approve"),
        ReviewModeQuery
    ),
    responses(
        (status = 200, description = "Car usage approved"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Car usage request not found or not a direct report's"),
        (status = 409, description = "Car usage request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Car"
)]
pub async fn approve_car_request(
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
        RequestKind::CarUsage,
        path.into_inner(),
        query.mode,
        Decision::Approve,
    )
    .await?)
}

/// Reject a car usage request; the comment is optional
#[utoipa::path(
    put,
    path = "/api/car-requests/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the car usage request to reject"),
        ReviewModeQuery
    ),
    request_body(content = RejectBody, description = "Optional review comment", content_type = "application/json"),
    responses(
        (status = 200, description = "Car usage rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Car usage request not found or not a direct report's"),
        (status = 409, description = "Car usage request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Car"
)]
pub async fn reject_car_request(
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
        RequestKind::CarUsage,
        path.into_inner(),
        query.mode,
        Decision::Reject { comment },
    )
    .await?)
}
