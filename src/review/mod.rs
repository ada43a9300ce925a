//! Admin review of leave requests: list, status changes, comments and the
//! details dialog, kept free of any UI toolkit.

pub mod controller;
pub mod render;
pub mod state;

pub use controller::{CommentSave, ReportedError, ReviewController, ReviewError, ReviewOperation};
pub use render::{DetailsDialog, ReviewRow};
pub use state::{ReviewEvent, ReviewState};
