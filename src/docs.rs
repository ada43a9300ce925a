use crate::api::requests::{UpdateComment, UpdateStatus};
use crate::model::leave_request::{
    LeaveDetail, LeaveRequest, NewLeaveDetail, NewLeaveRequest, UserLeaveSummary,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dopust API",
        version = "0.1.0",
        description = r#"
## Leave request management

Employees submit leave requests; administrators review them.

- **Review**: list every request with its leave entries, change its status, comment on it
- **Self service**: submit a request and list your own requests (bearer token)
- **Statistics**: accepted / denied / in-progress counts per user

Statuses are `Accepted`, `Denied` and `In Progress`. Errors are returned as `{ "message": ... }`.
"#,
    ),
    paths(
        crate::api::health::api_test,
        crate::api::requests::grouped_requests,
        crate::api::requests::update_status,
        crate::api::requests::update_comment,
        crate::api::requests::user_requests,
        crate::api::requests::create_request,
        crate::api::requests::user_request_statuses
    ),
    components(
        schemas(
            LeaveRequest,
            LeaveDetail,
            NewLeaveRequest,
            NewLeaveDetail,
            UserLeaveSummary,
            UpdateStatus,
            UpdateComment
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Requests", description = "Leave request APIs"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
