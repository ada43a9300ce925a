use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{RepositoryError, RequestRepository};
use crate::model::leave_request::{
    LeaveDetail, LeaveRequest, NewLeaveRequest, RequestStatus, UserLeaveSummary,
};

#[derive(Debug, Clone)]
struct Requester {
    id: u64,
    ime: String,
    priimek: String,
    email: String,
}

#[derive(Debug, Default)]
struct Store {
    requesters: Vec<Requester>,
    // (owner id, request), in insertion order
    requests: Vec<(u64, LeaveRequest)>,
    leave_types: Vec<String>,
    next_id: u64,
}

/// Request storage held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRequestRepository {
    store: Mutex<Store>,
}

impl InMemoryRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requester(self, id: u64, ime: &str, priimek: &str, email: &str) -> Self {
        self.lock().requesters.push(Requester {
            id,
            ime: ime.to_string(),
            priimek: priimek.to_string(),
            email: email.to_string(),
        });
        self
    }

    pub fn with_leave_types<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().leave_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Seeds a request owned by `owner_id`. Name and email are taken from the
    /// registered requester when the request leaves them empty.
    pub fn with_request(self, owner_id: u64, mut request: LeaveRequest) -> Self {
        {
            let mut store = self.lock();
            if let Some(owner) = store.requesters.iter().find(|r| r.id == owner_id) {
                if request.email.is_empty() {
                    request.email = owner.email.clone();
                }
                if request.ime.is_empty() {
                    request.ime = owner.ime.clone();
                }
                if request.priimek.is_empty() {
                    request.priimek = owner.priimek.clone();
                }
            }
            store.next_id = store.next_id.max(request.id);
            store.requests.push((owner_id, request));
        }
        self
    }

    pub fn get(&self, id: u64) -> Option<LeaveRequest> {
        self.lock()
            .requests
            .iter()
            .find(|(_, r)| r.id == id)
            .map(|(_, r)| r.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn patch(&self, id: u64, apply: impl FnOnce(&mut LeaveRequest)) -> bool {
        let mut store = self.lock();
        match store.requests.iter_mut().find(|(_, r)| r.id == id) {
            Some((_, request)) => {
                apply(request);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn fetch_grouped(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let store = self.lock();
        let mut owners: Vec<u64> = Vec::new();
        for (owner, _) in &store.requests {
            if !owners.contains(owner) {
                owners.push(*owner);
            }
        }

        Ok(owners
            .iter()
            .flat_map(|owner| {
                store
                    .requests
                    .iter()
                    .filter(move |(o, _)| o == owner)
                    .map(|(_, r)| r.clone())
            })
            .collect())
    }

    async fn fetch_for_user(&self, user_id: u64) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Ok(self
            .lock()
            .requests
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn update_status(&self, id: u64, status: RequestStatus) -> Result<bool, RepositoryError> {
        Ok(self.patch(id, |r| r.stanje = status))
    }

    async fn update_comment(&self, id: u64, comment: &str) -> Result<bool, RepositoryError> {
        Ok(self.patch(id, |r| r.komentar = comment.to_string()))
    }

    async fn status_summary(&self) -> Result<Vec<UserLeaveSummary>, RepositoryError> {
        let store = self.lock();
        let mut requesters = store.requesters.clone();
        requesters.sort_by(|a, b| (&a.priimek, &a.ime).cmp(&(&b.priimek, &b.ime)));

        Ok(requesters
            .into_iter()
            .map(|requester| {
                let count = |status: RequestStatus| {
                    store
                        .requests
                        .iter()
                        .filter(|(owner, r)| *owner == requester.id && r.stanje == status)
                        .count() as u64
                };
                UserLeaveSummary {
                    odobreni_dopusti: count(RequestStatus::Accepted),
                    zavrnjeni_dopusti: count(RequestStatus::Denied),
                    dopusti_v_obdelavi: count(RequestStatus::InProgress),
                    ime: requester.ime,
                    priimek: requester.priimek,
                    email: requester.email,
                }
            })
            .collect())
    }

    async fn create(&self, user_id: u64, request: &NewLeaveRequest) -> Result<u64, RepositoryError> {
        let mut store = self.lock();

        if let Some(unknown) = request
            .dopusti
            .iter()
            .find(|d| !store.leave_types.iter().any(|t| t == &d.tip_dopusta))
        {
            return Err(RepositoryError::UnknownLeaveType(unknown.tip_dopusta.clone()));
        }

        let owner = store.requesters.iter().find(|r| r.id == user_id).cloned();
        store.next_id += 1;
        let id = store.next_id;
        let today: NaiveDate = Utc::now().date_naive();

        let created = LeaveRequest {
            id,
            ime: owner.as_ref().map(|o| o.ime.clone()).unwrap_or_default(),
            priimek: owner.as_ref().map(|o| o.priimek.clone()).unwrap_or_default(),
            email: owner.map(|o| o.email).unwrap_or_default(),
            datum_zahteve: today,
            stanje: RequestStatus::InProgress,
            komentar: String::new(),
            dopusti: request
                .dopusti
                .iter()
                .map(|d| LeaveDetail {
                    tip_dopusta: d.tip_dopusta.clone(),
                    zacetek: d.zacetek,
                    konec: d.konec,
                    razlog: d.razlog.clone(),
                })
                .collect(),
        };
        store.requests.push((user_id, created));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::NewLeaveDetail;

    fn request(id: u64, stanje: RequestStatus) -> LeaveRequest {
        LeaveRequest {
            id,
            ime: String::new(),
            priimek: String::new(),
            email: String::new(),
            datum_zahteve: NaiveDate::from_ymd_opt(2024, 11, 25).unwrap(),
            stanje,
            komentar: String::new(),
            dopusti: vec![],
        }
    }

    fn repo() -> InMemoryRequestRepository {
        InMemoryRequestRepository::new()
            .with_requester(1, "John", "Doe", "john@example.com")
            .with_requester(2, "Alice", "Brown", "alice@example.com")
            .with_leave_types(["Annual Leave", "Sick Leave"])
            .with_request(1, request(10, RequestStatus::Accepted))
            .with_request(2, request(11, RequestStatus::InProgress))
            .with_request(1, request(12, RequestStatus::Denied))
    }

    #[tokio::test]
    async fn grouped_fetch_keeps_requesters_together() {
        let grouped = repo().fetch_grouped().await.unwrap();
        let ids: Vec<u64> = grouped.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 12, 11]);
        assert_eq!(grouped[0].email, "john@example.com");
    }

    #[tokio::test]
    async fn updates_report_missing_ids() {
        let repo = repo();
        assert!(repo.update_status(11, RequestStatus::Denied).await.unwrap());
        assert!(!repo.update_status(99, RequestStatus::Denied).await.unwrap());
        assert!(repo.update_comment(10, "ok").await.unwrap());
        assert!(!repo.update_comment(99, "ok").await.unwrap());

        assert_eq!(repo.get(11).unwrap().stanje, RequestStatus::Denied);
        assert_eq!(repo.get(10).unwrap().komentar, "ok");
    }

    #[tokio::test]
    async fn summary_counts_per_status() {
        let summary = repo().status_summary().await.unwrap();
        assert_eq!(summary[0].ime, "Alice");
        assert_eq!(summary[0].dopusti_v_obdelavi, 1);
        assert_eq!(summary[1].ime, "John");
        assert_eq!(summary[1].odobreni_dopusti, 1);
        assert_eq!(summary[1].zavrnjeni_dopusti, 1);
    }

    #[tokio::test]
    async fn create_rejects_unknown_leave_type() {
        let repo = repo();
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let new = |tip: &str| NewLeaveRequest {
            dopusti: vec![NewLeaveDetail {
                tip_dopusta: tip.into(),
                zacetek: day,
                konec: day,
                razlog: "flu".into(),
            }],
        };

        let err = repo.create(2, &new("Gardening")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownLeaveType(t) if t == "Gardening"));

        let id = repo.create(2, &new("Sick Leave")).await.unwrap();
        assert_eq!(id, 13);
        let created = repo.get(id).unwrap();
        assert_eq!(created.stanje, RequestStatus::InProgress);
        assert_eq!(created.email, "alice@example.com");
        assert_eq!(created.dopusti[0].razlog, "flu");
    }
}
