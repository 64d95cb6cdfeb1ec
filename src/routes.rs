use crate::{
    api::{attendance, car_request, kiosk, leave_request, makeup_request},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;

// Helper to build per-scope limiter
fn build_limiter(requests_per_min: u32) -> Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {} per minute", requests_per_min))?;
    Ok(Governor::new(&cfg))
}

/// Limiters are built once at startup and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    kiosk: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
    protected: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            kiosk: Arc::new(build_limiter(config.rate_kiosk_per_min)?),
            protected: Arc::new(build_limiter(config.rate_protected_per_min)?),
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &Limiters) {
    // Public kiosk route, PIN is the credential
    cfg.service(
        web::scope("/kiosk").service(
            web::resource("/punch")
                .wrap(limiters.kiosk.clone())
                .route(web::post().to(kiosk::punch)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiters.protected.clone()) // rate limiting
            .service(
                web::scope("/attendance")
                    .service(web::resource("/recent").route(web::get().to(attendance::recent)))
                    .service(web::resource("/report").route(web::get().to(attendance::monthly_report)))
                    .service(web::resource("/summary").route(web::get().to(attendance::team_summary)))
                    // /attendance/{id}
                    .service(web::resource("/{id}").route(web::delete().to(attendance::delete_punch))),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(web::resource("/types").route(web::get().to(leave_request::leave_types)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/makeup")
                    .service(
                        web::resource("")
                            .route(web::get().to(makeup_request::makeup_list))
                            .route(web::post().to(makeup_request::create_makeup)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(makeup_request::approve_makeup)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(makeup_request::reject_makeup)),
                    ),
            )
            .service(
                web::scope("/car-requests")
                    .service(
                        web::resource("")
                            .route(web::get().to(car_request::car_request_list))
                            .route(web::post().to(car_request::create_car_request)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(car_request::approve_car_request)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(car_request::reject_car_request)),
                    ),
            ),
    );
}
