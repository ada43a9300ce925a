//! HTTP-facing error type.
//!
//! Every error leaves the server as `{ "message": ... }` with a matching
//! status code, which is what the frontend reads.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal Server Error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownLeaveType(name) => {
                ApiError::BadRequest(format!("Unknown leave type: {name}"))
            }
            other => {
                tracing::error!(error = %other, "Leave request repository failed");
                ApiError::Internal
            }
        }
    }
}
