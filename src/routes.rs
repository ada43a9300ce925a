use crate::{
    api::{health, requests},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

// Helper to build the per-scope limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let burst = requests_per_min.max(1);
    let per_ms = (60_000 / burst as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_protected_per_min))
            .route("/test", web::get().to(health::api_test))
            .service(
                web::scope("/requests")
                    // /requests
                    .service(
                        web::resource("")
                            .route(web::put().to(requests::update_status))
                            .route(web::post().to(requests::create_request)),
                    )
                    // /requests/grouped
                    .route("/grouped", web::get().to(requests::grouped_requests))
                    // /requests/comment
                    .route("/comment", web::put().to(requests::update_comment))
                    // /requests/user-requests (bearer token)
                    .route("/user-requests", web::get().to(requests::user_requests))
                    // /requests/user-request-statuses
                    .route(
                        "/user-request-statuses",
                        web::get().to(requests::user_request_statuses),
                    ),
            ),
    );
}
