use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// Liveness probe used by the frontend build checks.
#[utoipa::path(
    get,
    path = "/api/test",
    responses(
        (status = 200, description = "API is up", body = Object, example = json!({
            "message": "API is working!"
        }))
    ),
    tag = "Health"
)]
pub async fn api_test() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "API is working!" }))
}
