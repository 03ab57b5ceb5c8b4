//! Aggregator: the derived views.
//!
//! Every view is a pure function of the full normalized record slice and
//! none depends on another. Empty input never fails: views come back empty
//! or NaN-bearing.
//!
//! - [`ready_for_review`] - applications with status "ready"
//! - [`support_by_demographics`] - award totals per location/gender/year
//! - [`underutilization`] - unspent balances per year/assistance type
//! - [`turnaround_summary`] / [`turnaround_timeline`] - request-to-support delays
//! - [`high_level_summary`] - totals and year-over-year change

pub mod demographics;
pub mod review;
pub mod stats;
pub mod summary;
pub mod turnaround;
pub mod underutilization;

pub use demographics::{support_by_demographics, DemographicSupportRow};
pub use review::{ready_for_review, ReadyForReviewRow};
pub use summary::{high_level_summary, yearly_pct_change, HighLevelSummary, YearlyChange};
pub use turnaround::{turnaround_summary, turnaround_timeline, TimelinePoint, TurnaroundSummary};
pub use underutilization::{underutilization, UnderutilizationRow};

use crate::models::NormalizedRecord;

/// All derived views of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    pub ready_for_review: Vec<ReadyForReviewRow>,
    pub support_by_demographics: Vec<DemographicSupportRow>,
    pub underutilization: Vec<UnderutilizationRow>,
    pub turnaround_summary: TurnaroundSummary,
    pub turnaround_timeline: Vec<TimelinePoint>,
    pub high_level_summary: HighLevelSummary,
}

impl DerivedViews {
    pub fn compute(records: &[NormalizedRecord]) -> Self {
        Self {
            ready_for_review: ready_for_review(records),
            support_by_demographics: support_by_demographics(records),
            underutilization: underutilization(records),
            turnaround_summary: turnaround_summary(records),
            turnaround_timeline: turnaround_timeline(records),
            high_level_summary: high_level_summary(records),
        }
    }
}
