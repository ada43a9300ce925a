use std::fmt;

use chrono::NaiveDate;

use super::state::ReviewState;
use crate::model::leave_request::LeaveDetail;

const DISPLAY_DATE: &str = "%d.%m.%Y";

fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

/// One entry of the review list as the screen binds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub id: u64,
    pub email: String,
    pub date: String,
    /// Comment field content.
    pub comment: String,
    /// Lower-cased status bound to the select control.
    pub status: String,
}

/// Read-only dialog for the selected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsDialog {
    pub date: String,
    pub status: String,
    pub comment: String,
    pub leaves: Vec<LeaveDetail>,
}

pub fn rows(state: &ReviewState) -> Vec<ReviewRow> {
    state
        .requests
        .iter()
        .map(|request| ReviewRow {
            id: request.id,
            email: request.email.clone(),
            date: display_date(request.datum_zahteve),
            comment: state
                .comment_value(request.id)
                .unwrap_or_default()
                .to_string(),
            status: request.stanje.select_value(),
        })
        .collect()
}

pub fn details(state: &ReviewState) -> Option<DetailsDialog> {
    state.selected_request().map(|request| DetailsDialog {
        date: display_date(request.datum_zahteve),
        status: request.stanje.to_string(),
        comment: request.komentar.clone(),
        leaves: request.dopusti.clone(),
    })
}

impl fmt::Display for DetailsDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Leave Request Details")?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Comment: {}", self.comment)?;
        writeln!(f, "Leave Details:")?;
        for leave in &self.leaves {
            writeln!(f, "Leave Type: {}", leave.tip_dopusta)?;
            writeln!(f, "Start Date: {}", leave.zacetek)?;
            writeln!(f, "End Date: {}", leave.konec)?;
            writeln!(f, "Reason: {}", leave.razlog)?;
            writeln!(f, "--------------------")?;
        }
        Ok(())
    }
}
