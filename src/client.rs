//! Typed HTTP client for the leave request endpoints.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::model::leave_request::{LeaveRequest, RequestStatus, UserLeaveSummary};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Server { status: u16, message: String },

    /// The server refused a status value (HTTP 400 on a status update).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("failed to parse response: {0}")]
    Decode(String),
}

/// Body returned by the mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Operations the review view needs from the backend.
#[async_trait]
pub trait RequestApi: Send + Sync {
    async fn fetch_grouped_requests(&self) -> Result<Vec<LeaveRequest>, ClientError>;

    async fn update_status(&self, id: u64, status: RequestStatus) -> Result<Ack, ClientError>;

    async fn update_comment(&self, id: u64, comment: &str) -> Result<Ack, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:23077/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorize(builder).send().await?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// Requests of the user the token belongs to.
    pub async fn fetch_user_requests(&self) -> Result<Vec<LeaveRequest>, ClientError> {
        self.send(self.client.get(self.url("/requests/user-requests")))
            .await
    }

    pub async fn fetch_status_summary(&self) -> Result<Vec<UserLeaveSummary>, ClientError> {
        self.send(self.client.get(self.url("/requests/user-request-statuses")))
            .await
    }
}

#[async_trait]
impl RequestApi for ApiClient {
    async fn fetch_grouped_requests(&self) -> Result<Vec<LeaveRequest>, ClientError> {
        self.send(self.client.get(self.url("/requests/grouped")))
            .await
    }

    async fn update_status(&self, id: u64, status: RequestStatus) -> Result<Ack, ClientError> {
        self.send(
            self.client
                .put(self.url("/requests"))
                .json(&json!({ "id": id, "status": status })),
        )
        .await
        .map_err(|err| match err {
            // the server rejected the status value
            ClientError::Server { status: 400, message } => ClientError::Validation(message),
            other => other,
        })
    }

    async fn update_comment(&self, id: u64, comment: &str) -> Result<Ack, ClientError> {
        self.send(
            self.client
                .put(self.url("/requests/comment"))
                .json(&json!({ "id": id, "comment": comment })),
        )
        .await
    }
}
