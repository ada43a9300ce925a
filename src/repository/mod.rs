//! Persistence of leave requests.
//!
//! Handlers and tests talk to [`RequestRepository`]; `mysql` backs the
//! running service and `memory` backs tests and local demos.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;

use crate::model::leave_request::{
    LeaveDetail, LeaveRequest, NewLeaveRequest, RequestStatus, UserLeaveSummary,
};

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRequestRepository;
pub use mysql::MySqlRequestRepository;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unknown leave type `{0}`")]
    UnknownLeaveType(String),

    #[error("request {id} has an invalid status `{value}`")]
    InvalidStoredStatus { id: u64, value: String },
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// All requests with their leave entries, requests of one requester kept together.
    async fn fetch_grouped(&self) -> Result<Vec<LeaveRequest>, RepositoryError>;

    async fn fetch_for_user(&self, user_id: u64) -> Result<Vec<LeaveRequest>, RepositoryError>;

    /// Returns `false` when no request has this id.
    async fn update_status(&self, id: u64, status: RequestStatus) -> Result<bool, RepositoryError>;

    /// Returns `false` when no request has this id.
    async fn update_comment(&self, id: u64, comment: &str) -> Result<bool, RepositoryError>;

    async fn status_summary(&self) -> Result<Vec<UserLeaveSummary>, RepositoryError>;

    /// Stores a new request for `user_id` and returns its id.
    async fn create(&self, user_id: u64, request: &NewLeaveRequest) -> Result<u64, RepositoryError>;
}

/// One row of the request/leave join. Requests without leave entries come
/// back with the detail columns set to NULL.
#[derive(Debug, Clone, FromRow)]
pub struct RequestRow {
    pub id: u64,
    pub ime: String,
    pub priimek: String,
    pub email: String,
    pub datum_zahteve: NaiveDate,
    pub stanje: String,
    pub komentar: Option<String>,
    pub tip_dopusta: Option<String>,
    pub zacetek: Option<NaiveDate>,
    pub konec: Option<NaiveDate>,
    pub razlog: Option<String>,
}

/// Folds joined rows into requests. Requests keep the order in which they
/// first appear, leave entries keep row order.
pub fn group_rows(rows: Vec<RequestRow>) -> Result<Vec<LeaveRequest>, RepositoryError> {
    let mut grouped: Vec<LeaveRequest> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.id) {
            Some(&slot) => slot,
            None => {
                let stanje = RequestStatus::parse(&row.stanje).ok_or_else(|| {
                    RepositoryError::InvalidStoredStatus {
                        id: row.id,
                        value: row.stanje.clone(),
                    }
                })?;
                grouped.push(LeaveRequest {
                    id: row.id,
                    ime: row.ime.clone(),
                    priimek: row.priimek.clone(),
                    email: row.email.clone(),
                    datum_zahteve: row.datum_zahteve,
                    stanje,
                    komentar: row.komentar.clone().unwrap_or_default(),
                    dopusti: Vec::new(),
                });
                index.insert(row.id, grouped.len() - 1);
                grouped.len() - 1
            }
        };

        if let (Some(zacetek), Some(konec)) = (row.zacetek, row.konec) {
            grouped[slot].dopusti.push(LeaveDetail {
                tip_dopusta: row.tip_dopusta.unwrap_or_default(),
                zacetek,
                konec,
                razlog: row.razlog.unwrap_or_default(),
            });
        }
    }

    Ok(grouped)
}
