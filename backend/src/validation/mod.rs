//! Header validation at the Normalizer boundary.
//!
//! Maps the source spreadsheet's column headers onto [`SourceField`]s.
//! Matching ignores case, surrounding whitespace and repeated inner
//! whitespace, so `" pt  city"` resolves to `Pt City`.
//!
//! # Example
//!
//! ```rust,ignore
//! use grantprep::validation::{resolve_columns, SourceField};
//!
//! let headers = vec!["Patient ID#".to_string(), /* ... */];
//! let columns = resolve_columns(&headers)?;
//! let amount_idx = columns.get(SourceField::Amount);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SchemaError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A column of the raw grant export the normalizer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceField {
    PatientId,
    RequestDate,
    SupportDate,
    Status,
    Signed,
    Amount,
    AppYear,
    AssistanceType,
    BirthDate,
    Gender,
    Income,
    City,
    State,
    RemainingBalance,
}

impl SourceField {
    pub const ALL: [SourceField; 14] = [
        SourceField::PatientId,
        SourceField::RequestDate,
        SourceField::SupportDate,
        SourceField::Status,
        SourceField::Signed,
        SourceField::Amount,
        SourceField::AppYear,
        SourceField::AssistanceType,
        SourceField::BirthDate,
        SourceField::Gender,
        SourceField::Income,
        SourceField::City,
        SourceField::State,
        SourceField::RemainingBalance,
    ];

    /// Accepted source headers; the first one is the canonical export name.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            SourceField::PatientId => &["Patient ID#"],
            SourceField::RequestDate => &["Grant Req Date"],
            SourceField::SupportDate => &[
                "Payment Submitted?",
                "Payment Date",
                "Support Date",
                "Date Supported",
            ],
            SourceField::Status => &["Request Status"],
            SourceField::Signed => &["Application Signed?"],
            SourceField::Amount => &["Amount"],
            SourceField::AppYear => &["App Year"],
            SourceField::AssistanceType => &["Type of Assistance (CLASS)"],
            SourceField::BirthDate => &["DOB"],
            SourceField::Gender => &["Gender"],
            SourceField::Income => &["Total Household Gross Monthly Income"],
            SourceField::City => &["Pt City"],
            SourceField::State => &["Pt State"],
            SourceField::RemainingBalance => &["Remaining Balance"],
        }
    }

    /// Only the support date may be absent; turnaround views are empty without it.
    pub fn is_required(self) -> bool {
        !matches!(self, SourceField::SupportDate)
    }
}

/// Canonical form used to compare headers.
pub fn normalize_header(header: &str) -> String {
    WHITESPACE
        .replace_all(header.trim(), " ")
        .to_lowercase()
}

/// Positions of the resolved source columns within a raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<SourceField, usize>,
}

impl ColumnIndex {
    pub fn get(&self, field: SourceField) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn has(&self, field: SourceField) -> bool {
        self.positions.contains_key(&field)
    }
}

/// Resolve every [`SourceField`] against `headers`.
///
/// Fails with [`SchemaError::MissingColumns`] naming every required column
/// that is absent. When several headers match, the leftmost wins.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnIndex, SchemaError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let mut positions = HashMap::new();
    let mut missing = Vec::new();

    for field in SourceField::ALL {
        let accepted: Vec<String> = field.headers().iter().map(|h| normalize_header(h)).collect();
        match normalized.iter().position(|h| accepted.contains(h)) {
            Some(idx) => {
                positions.insert(field, idx);
            }
            None if field.is_required() => missing.push(field.headers()[0].to_string()),
            None => {}
        }
    }

    if missing.is_empty() {
        Ok(ColumnIndex { positions })
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}
