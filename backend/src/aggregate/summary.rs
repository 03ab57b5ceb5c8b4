//! Scalar rollup with year-over-year change in awarded dollars.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::stats::mean;
use crate::models::{Cell, IntoTable, NormalizedRecord};

/// Awarded dollars in one request year and the change from the prior one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyChange {
    pub year: i32,
    pub award_amount: f64,
    /// `(this − previous) / previous`; NaN for the first year. Serialized as
    /// `null` when not finite.
    pub yoy_pct_change: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighLevelSummary {
    pub total_applications: usize,
    pub total_dollars: f64,
    /// NaN when no record has both dates.
    pub avg_turnaround_days: f64,
    pub yearly_pct_change: Vec<YearlyChange>,
}

pub fn high_level_summary(records: &[NormalizedRecord]) -> HighLevelSummary {
    let turnarounds: Vec<f64> = records
        .iter()
        .filter_map(NormalizedRecord::turnaround_days)
        .map(|d| d as f64)
        .collect();

    HighLevelSummary {
        total_applications: records.len(),
        total_dollars: records.iter().map(|r| r.award_amount).sum(),
        avg_turnaround_days: mean(&turnarounds),
        yearly_pct_change: yearly_pct_change(records),
    }
}

/// Awards summed by the year of `request_date`, each compared with the
/// previous year present in the data.
///
/// Records without a request date are left out. A zero prior total gives an
/// infinite change (NaN when both years are zero).
pub fn yearly_pct_change(records: &[NormalizedRecord]) -> Vec<YearlyChange> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for r in records {
        if let Some(date) = r.request_date {
            *by_year.entry(date.year()).or_insert(0.0) += r.award_amount;
        }
    }

    let mut previous: Option<f64> = None;
    by_year
        .into_iter()
        .map(|(year, award_amount)| {
            let yoy_pct_change = match previous {
                Some(prev) => (award_amount - prev) / prev,
                None => f64::NAN,
            };
            previous = Some(award_amount);
            YearlyChange {
                year,
                award_amount,
                yoy_pct_change,
            }
        })
        .collect()
}

impl IntoTable for HighLevelSummary {
    const COLUMNS: &'static [&'static str] = &[
        "total_applications",
        "total_dollars",
        "avg_turnaround_days",
        "yearly_pct_change",
    ];

    fn cells(&self) -> Vec<Cell> {
        // Vec<YearlyChange> only holds numbers, serialization cannot fail.
        let series = serde_json::to_string(&self.yearly_pct_change).unwrap_or_default();
        vec![
            Cell::Int(self.total_applications as i64),
            Cell::Number(self.total_dollars),
            Cell::Number(self.avg_turnaround_days),
            Cell::Text(series),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{date, record};

    fn award(year: i32, amount: f64) -> NormalizedRecord {
        NormalizedRecord {
            request_date: date(year, 6, 1),
            award_amount: amount,
            ..record()
        }
    }

    #[test]
    fn test_year_over_year_change() {
        let records = vec![award(2020, 600.0), award(2021, 1500.0), award(2020, 400.0)];
        let series = yearly_pct_change(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 2020);
        assert_eq!(series[0].award_amount, 1000.0);
        assert!(series[0].yoy_pct_change.is_nan());
        assert_eq!(series[1].yoy_pct_change, 0.5);
    }

    #[test]
    fn test_zero_prior_year() {
        let series = yearly_pct_change(&[award(2019, 0.0), award(2020, 0.0), award(2021, 10.0)]);
        assert!(series[1].yoy_pct_change.is_nan());
        assert_eq!(series[2].yoy_pct_change, f64::INFINITY);
    }

    #[test]
    fn test_totals_ignore_missing_dates() {
        let mut undated = award(2020, 50.0);
        undated.request_date = None;
        let mut supported = award(2021, 10.0);
        supported.support_date = date(2021, 6, 11);

        let summary = high_level_summary(&[undated, supported, award(2021, 5.0)]);
        assert_eq!(summary.total_applications, 3);
        assert_eq!(summary.total_dollars, 65.0);
        assert_eq!(summary.avg_turnaround_days, 10.0);
        assert_eq!(summary.yearly_pct_change.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let summary = high_level_summary(&[]);
        assert_eq!(summary.total_applications, 0);
        assert_eq!(summary.total_dollars, 0.0);
        assert!(summary.avg_turnaround_days.is_nan());
        assert!(summary.yearly_pct_change.is_empty());
    }

    #[test]
    fn test_series_serialized_as_json() {
        let summary = high_level_summary(&[award(2020, 1000.0), award(2021, 1500.0)]);
        let cells = summary.cells();
        assert_eq!(
            cells[3].render(),
            r#"[{"year":2020,"award_amount":1000.0,"yoy_pct_change":null},{"year":2021,"award_amount":1500.0,"yoy_pct_change":0.5}]"#
        );
    }
}
