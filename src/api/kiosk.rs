use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::model::attendance::{CheckType, GeoReading};
use crate::service::{clock::SystemClock, ledger};
use crate::store::mysql::MySqlStore;
use crate::utils::location_cache::LocationCache;

#[derive(Debug, Deserialize, ToSchema)]
pub struct KioskPunchReq {
    #[schema(example = "042731")]
    pub pin: String,
    pub check_type: CheckType,
    /// Omitted when the device could not obtain a position in time.
    pub location: Option<GeoReading>,
}

/// Clock in or out at the kiosk
#[utoipa::path(
    post,
    path = "/kiosk/punch",
    request_body(
        content = KioskPunchReq,
        description = "PIN, punch direction and optional device position",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Punch recorded", body = crate::service::ledger::KioskPunchResult),
        (status = 400, description = "Malformed PIN", body = Object, example = json!({
            "error": "VALIDATION_ERROR",
            "message": "PIN must be exactly 6 digits"
        })),
        (status = 401, description = "PIN does not match an active employee"),
        (status = 429, description = "Same punch type recorded within the last 5 minutes", body = Object, example = json!({
            "error": "DUPLICATE_PUNCH",
            "message": "IN punch already recorded within the last 5 minutes, please wait"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Kiosk"
)]
pub async fn punch(
    store: web::Data<MySqlStore>,
    clock: web::Data<SystemClock>,
    locations: web::Data<LocationCache>,
    payload: web::Json<KioskPunchReq>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();

    // without the location list the punch is still taken, judged against the default site
    let sites = match locations.active_locations(store.get_ref()).await {
        Ok(sites) => sites,
        Err(e) => {
            warn!(error = %e, "Failed to load company locations");
            Arc::new(Vec::new())
        }
    };

    let result = ledger::kiosk_punch(
        store.get_ref(),
        clock.get_ref(),
        &req.pin,
        req.check_type,
        req.location,
        &sites,
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}
