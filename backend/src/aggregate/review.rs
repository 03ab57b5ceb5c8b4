//! Applications whose status is "ready".

use chrono::NaiveDate;

use crate::models::{Cell, IntoTable, NormalizedRecord};

/// Projection of a ready application.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyForReviewRow {
    pub patient_id: String,
    pub request_date: Option<NaiveDate>,
    pub status: String,
    pub signed_committee: String,
}

/// Records whose status equals "ready" ignoring case, in input order.
pub fn ready_for_review(records: &[NormalizedRecord]) -> Vec<ReadyForReviewRow> {
    records
        .iter()
        .filter(|r| r.is_ready_for_review())
        .map(|r| ReadyForReviewRow {
            patient_id: r.patient_id.clone(),
            request_date: r.request_date,
            status: r.status.clone(),
            signed_committee: r.signed_committee.clone(),
        })
        .collect()
}

impl IntoTable for ReadyForReviewRow {
    const COLUMNS: &'static [&'static str] =
        &["patient_id", "request_date", "status", "signed_committee"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.patient_id),
            Cell::date(self.request_date),
            Cell::text(&self.status),
            Cell::text(&self.signed_committee),
        ]
    }
}
