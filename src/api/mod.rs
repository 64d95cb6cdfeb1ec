//! HTTP handlers. Thin wrappers that resolve the caller's scope and hand
//! off to `service`.

use actix_web::HttpResponse;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::AppResult;
use crate::model::request::RequestKind;
use crate::service::{
    clock::SystemClock,
    request_flow::{self, AccessScope, Decision, ListMode, RequestListQuery},
};
use crate::store::mysql::MySqlStore;

pub mod attendance;
pub mod car_request;
pub mod kiosk;
pub mod leave_request;
pub mod makeup_request;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectBody {
    /// Required when rejecting a makeup request.
    #[schema(example = "No matching badge record")]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReviewModeQuery {
    /// supervisor | admin
    pub mode: Option<ListMode>,
}

pub(crate) async fn list_kind(
    auth: &AuthUser,
    store: &MySqlStore,
    kind: RequestKind,
    query: RequestListQuery,
) -> AppResult<HttpResponse> {
    let scope = AccessScope::resolve(auth, query.mode.unwrap_or_default())?;
    let status = query.status.unwrap_or_default().status();
    let requests = request_flow::list_requests(store, scope, kind, status).await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": requests.len(),
        "data": requests,
    })))
}

pub(crate) async fn review_kind(
    auth: &AuthUser,
    store: &MySqlStore,
    clock: &SystemClock,
    kind: RequestKind,
    request_id: u64,
    mode: Option<ListMode>,
    decision: Decision,
) -> AppResult<HttpResponse> {
    let scope = AccessScope::resolve(auth, mode.unwrap_or_default())?;
    let outcome =
        request_flow::review_request(store, clock, auth, scope, kind, request_id, decision).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
