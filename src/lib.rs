//! Leave request ("dopust") service: REST API over the request repository,
//! a typed client for it, and the admin review view model.

use std::sync::Arc;

use actix_web::web::{self, Data};

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod repository;
pub mod review;
pub mod routes;

use config::Config;
use error::ApiError;
use repository::RequestRepository;

/// Registers shared state and all API routes.
pub fn configure_app(cfg: &mut web::ServiceConfig, repo: Arc<dyn RequestRepository>, config: &Config) {
    // malformed bodies get the same `{ message }` shape as every other error
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

    cfg.app_data(Data::from(repo))
        .app_data(Data::new(config.clone()))
        .app_data(json_config)
        .configure(|cfg| routes::configure(cfg, config));
}
