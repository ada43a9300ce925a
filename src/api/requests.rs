use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave_request::{LeaveRequest, NewLeaveRequest, RequestStatus, UserLeaveSummary};
use crate::repository::RequestRepository;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatus {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Accepted")]
    /// One of Accepted, Denied, In Progress (any case)
    pub status: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateComment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Approved by HR")]
    pub comment: Option<String>,
}

/* =========================
Grouped requests (admin review)
========================= */
#[utoipa::path(
    get,
    path = "/api/requests/grouped",
    responses(
        (status = 200, description = "All leave requests with their leave entries", body = [LeaveRequest]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Requests"
)]
pub async fn grouped_requests(
    repo: web::Data<dyn RequestRepository>,
) -> actix_web::Result<impl Responder, ApiError> {
    let requests = repo.fetch_grouped().await?;
    debug!(count = requests.len(), "Serving grouped leave requests");
    Ok(HttpResponse::Ok().json(requests))
}

/* =========================
Update status
========================= */
#[utoipa::path(
    put,
    path = "/api/requests",
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Request status updated successfully"
        })),
        (status = 400, description = "Status not allowed", body = Object, example = json!({
            "message": "Invalid status. Allowed: Accepted, Denied, In Progress"
        })),
        (status = 404, description = "Request not found", body = Object, example = json!({
            "message": "Request not found"
        }))
    ),
    tag = "Requests"
)]
pub async fn update_status(
    repo: web::Data<dyn RequestRepository>,
    payload: web::Json<UpdateStatus>,
) -> actix_web::Result<impl Responder, ApiError> {
    let status = RequestStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid status. Allowed: {}", RequestStatus::ALLOWED))
    })?;

    if !repo.update_status(payload.id, status).await? {
        return Err(ApiError::NotFound("Request not found".into()));
    }

    info!(id = payload.id, %status, "Leave request status updated");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Request status updated successfully"
    })))
}

/* =========================
Update comment
========================= */
#[utoipa::path(
    put,
    path = "/api/requests/comment",
    request_body = UpdateComment,
    responses(
        (status = 200, description = "Comment updated", body = Object, example = json!({
            "message": "Request comment updated successfully"
        })),
        (status = 404, description = "Request not found", body = Object, example = json!({
            "message": "Request not found"
        }))
    ),
    tag = "Requests"
)]
pub async fn update_comment(
    repo: web::Data<dyn RequestRepository>,
    payload: web::Json<UpdateComment>,
) -> actix_web::Result<impl Responder, ApiError> {
    let comment = payload.comment.as_deref().unwrap_or_default();

    if !repo.update_comment(payload.id, comment).await? {
        return Err(ApiError::NotFound("Request not found".into()));
    }

    info!(id = payload.id, "Leave request comment updated");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Request comment updated successfully"
    })))
}

/* =========================
Requests of the caller
========================= */
#[utoipa::path(
    get,
    path = "/api/requests/user-requests",
    responses(
        (status = 200, description = "Leave requests of the authenticated user", body = [LeaveRequest]),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Token missing", body = Object, example = json!({
            "message": "Token is required"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn user_requests(
    auth: AuthUser,
    repo: web::Data<dyn RequestRepository>,
) -> actix_web::Result<impl Responder, ApiError> {
    let requests = repo.fetch_for_user(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/* =========================
Submit a leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = NewLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "id": 1
        })),
        (status = 400, description = "Invalid leave entries"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Token missing")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn create_request(
    auth: AuthUser,
    repo: web::Data<dyn RequestRepository>,
    payload: web::Json<NewLeaveRequest>,
) -> actix_web::Result<impl Responder, ApiError> {
    payload
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let id = repo.create(auth.user_id, &payload).await?;

    info!(id, user_id = auth.user_id, email = %auth.email, "Leave request submitted");
    Ok(HttpResponse::Created().json(json!({
        "message": "Leave request submitted",
        "id": id
    })))
}

/* =========================
Per-user status counts
========================= */
#[utoipa::path(
    get,
    path = "/api/requests/user-request-statuses",
    responses(
        (status = 200, description = "Leave counts per user and status", body = [UserLeaveSummary])
    ),
    tag = "Requests"
)]
pub async fn user_request_statuses(
    repo: web::Data<dyn RequestRepository>,
) -> actix_web::Result<impl Responder, ApiError> {
    let summary = repo.status_summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}
