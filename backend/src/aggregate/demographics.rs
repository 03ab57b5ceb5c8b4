//! Award totals by location, gender and application year.

use std::collections::BTreeMap;

use crate::models::{Cell, IntoTable, NormalizedRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct DemographicSupportRow {
    pub location: String,
    pub gender: String,
    pub application_year: Option<i32>,
    pub award_amount: f64,
}

/// Sum of `award_amount` per (location, gender, year), largest first.
///
/// Groups start in key order (a missing year sorts before any year) and the
/// sort is stable, so equal sums keep key order. Every record lands in a
/// group, so the grand total equals the input total.
pub fn support_by_demographics(records: &[NormalizedRecord]) -> Vec<DemographicSupportRow> {
    let mut groups: BTreeMap<(&str, &str, Option<i32>), f64> = BTreeMap::new();
    for r in records {
        *groups
            .entry((r.location.as_str(), r.gender.as_str(), r.application_year))
            .or_insert(0.0) += r.award_amount;
    }

    let mut rows: Vec<DemographicSupportRow> = groups
        .into_iter()
        .map(|((location, gender, application_year), award_amount)| DemographicSupportRow {
            location: location.to_string(),
            gender: gender.to_string(),
            application_year,
            award_amount,
        })
        .collect();

    rows.sort_by(|a, b| b.award_amount.total_cmp(&a.award_amount));
    rows
}

impl IntoTable for DemographicSupportRow {
    const COLUMNS: &'static [&'static str] =
        &["location", "gender", "application_year", "award_amount"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.location),
            Cell::text(&self.gender),
            Cell::year(self.application_year),
            Cell::Number(self.award_amount),
        ]
    }
}
