use std::collections::HashMap;

use crate::model::leave_request::{LeaveRequest, RequestStatus};

/// Everything the review screen shows, independent of any UI toolkit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewState {
    /// Requests in server order.
    pub requests: Vec<LeaveRequest>,
    /// Unsaved comment text per request id. Entries outlive a successful save.
    pub edit_buffer: HashMap<u64, String>,
    /// Request shown in the details dialog.
    pub selected: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    Loaded(Vec<LeaveRequest>),
    StatusChanged { id: u64, status: RequestStatus },
    CommentEdited { id: u64, text: String },
    CommentSaved { id: u64, comment: String },
    DetailsOpened(u64),
    DetailsClosed,
}

impl ReviewState {
    pub fn reduce(mut self, event: ReviewEvent) -> Self {
        match event {
            ReviewEvent::Loaded(requests) => {
                self.requests = requests;
                if let Some(id) = self.selected {
                    if self.request(id).is_none() {
                        self.selected = None;
                    }
                }
            }
            ReviewEvent::StatusChanged { id, status } => {
                if let Some(request) = self.request_mut(id) {
                    request.stanje = status;
                }
            }
            ReviewEvent::CommentEdited { id, text } => {
                self.edit_buffer.insert(id, text);
            }
            ReviewEvent::CommentSaved { id, comment } => {
                if let Some(request) = self.request_mut(id) {
                    request.komentar = comment;
                }
            }
            ReviewEvent::DetailsOpened(id) => {
                if self.request(id).is_some() {
                    self.selected = Some(id);
                }
            }
            ReviewEvent::DetailsClosed => self.selected = None,
        }
        self
    }

    pub fn request(&self, id: u64) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    fn request_mut(&mut self, id: u64) -> Option<&mut LeaveRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }

    /// Text shown in the comment field: the buffered edit, else the stored comment.
    pub fn comment_value(&self, id: u64) -> Option<&str> {
        self.edit_buffer
            .get(&id)
            .map(String::as_str)
            .or_else(|| self.request(id).map(|r| r.komentar.as_str()))
    }

    /// Buffered comment that differs from the stored one, if any.
    pub fn pending_comment(&self, id: u64) -> Option<&str> {
        let buffered = self.edit_buffer.get(&id)?;
        let request = self.request(id)?;
        (buffered != &request.komentar).then_some(buffered.as_str())
    }

    pub fn selected_request(&self) -> Option<&LeaveRequest> {
        self.selected.and_then(|id| self.request(id))
    }
}
