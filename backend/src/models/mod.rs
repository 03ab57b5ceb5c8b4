//! Domain models for the grant preparation pipeline.
//!
//! - [`NormalizedRecord`] - one grant application after normalization
//! - [`NormalizationReport`] - counts of values that fell back to a default
//! - [`Table`] / [`Cell`] - the tabular shape every artifact is exported in

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod table;

pub use table::{Cell, IntoTable, Table};

// =============================================================================
// Normalized Record
// =============================================================================

/// A grant application in the canonical internal schema.
///
/// Numeric fields are always defined: unparseable source values are coerced
/// to zero by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub patient_id: String,
    pub request_date: Option<NaiveDate>,
    pub support_date: Option<NaiveDate>,
    /// Trimmed and lowercased.
    pub status: String,
    /// Trimmed and lowercased.
    pub signed_committee: String,
    pub award_amount: f64,
    pub application_year: Option<i32>,
    pub assistance_type: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub income: f64,
    pub city: String,
    pub state: String,
    /// `"{city}, {state}"` with both parts trimmed.
    pub location: String,
    pub remaining_balance: f64,
}

impl NormalizedRecord {
    /// Whole days between request and support, when both dates are known.
    pub fn turnaround_days(&self) -> Option<i64> {
        match (self.request_date, self.support_date) {
            (Some(request), Some(support)) => Some((support - request).num_days()),
            _ => None,
        }
    }

    pub fn is_ready_for_review(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("ready")
    }
}

impl IntoTable for NormalizedRecord {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "request_date",
        "support_date",
        "status",
        "signed_committee",
        "award_amount",
        "application_year",
        "assistance_type",
        "date_of_birth",
        "gender",
        "income",
        "city",
        "state",
        "location",
        "remaining_balance",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.patient_id),
            Cell::date(self.request_date),
            Cell::date(self.support_date),
            Cell::text(&self.status),
            Cell::text(&self.signed_committee),
            Cell::Number(self.award_amount),
            Cell::year(self.application_year),
            Cell::optional_text(self.assistance_type.as_deref()),
            Cell::date(self.date_of_birth),
            Cell::text(&self.gender),
            Cell::Number(self.income),
            Cell::text(&self.city),
            Cell::text(&self.state),
            Cell::text(&self.location),
            Cell::Number(self.remaining_balance),
        ]
    }
}

// =============================================================================
// Normalization Report
// =============================================================================

/// Fallback counts for a single numeric field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFallbacks {
    /// Blank source cells (treated as zero).
    pub blank: usize,
    /// Non-blank values that could not be read as a non-negative number.
    pub coerced: usize,
}

impl NumericFallbacks {
    pub fn total(&self) -> usize {
        self.blank + self.coerced
    }
}

/// Data-quality diagnostics collected while normalizing.
///
/// Zero-fallback and missing-date exclusion are silent in the derived views;
/// this report is how they become visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub rows: usize,
    pub award_amount: NumericFallbacks,
    pub income: NumericFallbacks,
    pub remaining_balance: NumericFallbacks,
    /// Non-blank request dates that could not be parsed.
    pub unparsed_request_dates: usize,
    pub missing_request_dates: usize,
    /// Non-blank support dates that could not be parsed.
    pub unparsed_support_dates: usize,
    /// Whether the source carried a support date column at all.
    pub support_date_column: bool,
    pub unparsed_birth_dates: usize,
    pub missing_application_years: usize,
    pub missing_assistance_types: usize,
    /// Records lacking one of the two turnaround dates.
    pub turnaround_excluded: usize,
    /// Records whose support date precedes the request date.
    pub negative_turnarounds: usize,
}

/// One row of the `data_quality` artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityIssue {
    pub field: &'static str,
    pub issue: &'static str,
    pub count: usize,
}

impl NormalizationReport {
    /// Flattens the report into `(field, issue, count)` rows in a fixed order.
    pub fn issues(&self) -> Vec<QualityIssue> {
        let issue = |field, issue, count| QualityIssue { field, issue, count };
        vec![
            issue("*", "rows", self.rows),
            issue("award_amount", "blank_as_zero", self.award_amount.blank),
            issue("award_amount", "coerced_to_zero", self.award_amount.coerced),
            issue("income", "blank_as_zero", self.income.blank),
            issue("income", "coerced_to_zero", self.income.coerced),
            issue("remaining_balance", "blank_as_zero", self.remaining_balance.blank),
            issue("remaining_balance", "coerced_to_zero", self.remaining_balance.coerced),
            issue("request_date", "missing", self.missing_request_dates),
            issue("request_date", "unparsed", self.unparsed_request_dates),
            issue("support_date", "unparsed", self.unparsed_support_dates),
            issue("date_of_birth", "unparsed", self.unparsed_birth_dates),
            issue("application_year", "missing", self.missing_application_years),
            issue("assistance_type", "missing", self.missing_assistance_types),
            issue("turnaround_days", "excluded", self.turnaround_excluded),
            issue("turnaround_days", "negative", self.negative_turnarounds),
        ]
    }

    /// Total number of numeric values replaced by zero.
    pub fn zero_fallbacks(&self) -> usize {
        self.award_amount.total() + self.income.total() + self.remaining_balance.total()
    }
}

impl IntoTable for QualityIssue {
    const COLUMNS: &'static [&'static str] = &["field", "issue", "count"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.field),
            Cell::text(self.issue),
            Cell::Int(self.count as i64),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{date, record};
    use super::*;

    #[test]
    fn test_turnaround_requires_both_dates() {
        let mut r = record();
        r.request_date = date(2023, 1, 10);
        assert_eq!(r.turnaround_days(), None);

        r.support_date = date(2023, 2, 1);
        assert_eq!(r.turnaround_days(), Some(22));
    }

    #[test]
    fn test_ready_is_case_insensitive() {
        let mut r = record();
        r.status = "Ready ".to_string();
        assert!(r.is_ready_for_review());
        r.status = "ready for payment".to_string();
        assert!(!r.is_ready_for_review());
    }

    #[test]
    fn test_report_issue_order_is_stable() {
        let report = NormalizationReport {
            rows: 3,
            award_amount: NumericFallbacks { blank: 1, coerced: 2 },
            ..Default::default()
        };
        let issues = report.issues();
        assert_eq!(issues[0].count, 3);
        assert_eq!(issues[1].field, "award_amount");
        assert_eq!(issues[2].count, 2);
        assert_eq!(report.zero_fallbacks(), 3);
    }

    #[test]
    fn test_record_cells_match_columns() {
        assert_eq!(record().cells().len(), NormalizedRecord::COLUMNS.len());
    }
}
