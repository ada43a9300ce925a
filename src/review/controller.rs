use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use strum_macros::Display;
use tracing::{error, info, warn};

use super::render::{self, DetailsDialog, ReviewRow};
use super::state::{ReviewEvent, ReviewState};
use crate::client::{ClientError, RequestApi};
use crate::model::leave_request::RequestStatus;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("failed to load leave requests: {0}")]
    Load(#[source] ClientError),

    #[error("invalid status `{value}` for request {id}, allowed: {allowed}", allowed = RequestStatus::ALLOWED)]
    InvalidStatus { id: u64, value: String },

    #[error("failed to update status of request {id}: {source}")]
    Status { id: u64, source: ClientError },

    #[error("failed to update comment of request {id}: {source}")]
    Comment { id: u64, source: ClientError },

    #[error("request {0} is not in the list")]
    UnknownRequest(u64),
}

impl ReviewError {
    pub fn operation(&self) -> ReviewOperation {
        match self {
            ReviewError::Load(_) => ReviewOperation::Load,
            ReviewError::InvalidStatus { .. } | ReviewError::Status { .. } => {
                ReviewOperation::ChangeStatus
            }
            ReviewError::Comment { .. } => ReviewOperation::SaveComment,
            ReviewError::UnknownRequest(_) => ReviewOperation::Lookup,
        }
    }

    pub fn request_id(&self) -> Option<u64> {
        match self {
            ReviewError::Load(_) => None,
            ReviewError::InvalidStatus { id, .. }
            | ReviewError::Status { id, .. }
            | ReviewError::Comment { id, .. }
            | ReviewError::UnknownRequest(id) => Some(*id),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum ReviewOperation {
    Load,
    ChangeStatus,
    SaveComment,
    Lookup,
}

/// What subscribers of [`ReviewController::subscribe`] receive for each failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    pub operation: ReviewOperation,
    pub request_id: Option<u64>,
    pub message: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommentSave {
    /// Nothing buffered, or the buffer matches the stored comment.
    Unchanged,
    Saved,
}

/// Drives the admin review screen.
///
/// Handlers take `&self` and release the state lock before awaiting, so
/// calls for different requests may be in flight at once. Results that
/// arrive after [`unmount`](Self::unmount) are dropped.
pub struct ReviewController<A: RequestApi + ?Sized> {
    api: Arc<A>,
    state: Mutex<ReviewState>,
    mounted: AtomicBool,
    subscribers: Mutex<Vec<UnboundedSender<ReportedError>>>,
}

impl<A: RequestApi + ?Sized> ReviewController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(ReviewState::default()),
            mounted: AtomicBool::new(true),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> UnboundedReceiver<ReportedError> {
        let (tx, rx) = unbounded();
        lock(&self.subscribers).push(tx);
        rx
    }

    pub fn state(&self) -> ReviewState {
        lock(&self.state).clone()
    }

    pub fn rows(&self) -> Vec<ReviewRow> {
        render::rows(&lock(&self.state))
    }

    pub fn details(&self) -> Option<DetailsDialog> {
        render::details(&lock(&self.state))
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    fn dispatch(&self, event: ReviewEvent) {
        if !self.is_mounted() {
            warn!(?event, "View unmounted, dropping state update");
            return;
        }
        let mut state = lock(&self.state);
        let current = std::mem::take(&mut *state);
        *state = current.reduce(event);
    }

    fn report(&self, err: ReviewError) -> ReviewError {
        error!(
            error = %err,
            operation = %err.operation(),
            request_id = ?err.request_id(),
            "Leave request review failed"
        );

        let reported = ReportedError {
            operation: err.operation(),
            request_id: err.request_id(),
            message: err.to_string(),
        };
        lock(&self.subscribers).retain(|tx| tx.unbounded_send(reported.clone()).is_ok());
        err
    }

    /// Grouped fetch; replaces the whole list on success.
    pub async fn load(&self) -> Result<usize, ReviewError> {
        let requests = self
            .api
            .fetch_grouped_requests()
            .await
            .map_err(|e| self.report(ReviewError::Load(e)))?;

        let count = requests.len();
        self.dispatch(ReviewEvent::Loaded(requests));
        info!(count, "Leave requests loaded");
        Ok(count)
    }

    /// `selection` is the select value; any case of the three statuses is accepted.
    pub async fn change_status(&self, id: u64, selection: &str) -> Result<RequestStatus, ReviewError> {
        let status = RequestStatus::parse(selection).ok_or_else(|| {
            self.report(ReviewError::InvalidStatus {
                id,
                value: selection.to_string(),
            })
        })?;

        if lock(&self.state).request(id).is_none() {
            return Err(self.report(ReviewError::UnknownRequest(id)));
        }

        self.api
            .update_status(id, status)
            .await
            .map_err(|source| self.report(ReviewError::Status { id, source }))?;

        self.dispatch(ReviewEvent::StatusChanged { id, status });
        info!(id, %status, "Status updated successfully");
        Ok(status)
    }

    pub fn edit_comment(&self, id: u64, text: impl Into<String>) {
        self.dispatch(ReviewEvent::CommentEdited {
            id,
            text: text.into(),
        });
    }

    pub async fn save_comment(&self, id: u64) -> Result<CommentSave, ReviewError> {
        let pending = {
            let state = lock(&self.state);
            if state.request(id).is_none() {
                drop(state);
                return Err(self.report(ReviewError::UnknownRequest(id)));
            }
            state.pending_comment(id).map(str::to_owned)
        };

        let Some(comment) = pending else {
            return Ok(CommentSave::Unchanged);
        };

        self.api
            .update_comment(id, &comment)
            .await
            .map_err(|source| self.report(ReviewError::Comment { id, source }))?;

        self.dispatch(ReviewEvent::CommentSaved { id, comment });
        info!(id, "Comment updated successfully");
        Ok(CommentSave::Saved)
    }

    pub fn open_details(&self, id: u64) {
        self.dispatch(ReviewEvent::DetailsOpened(id));
    }

    pub fn close_details(&self) {
        self.dispatch(ReviewEvent::DetailsClosed);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
