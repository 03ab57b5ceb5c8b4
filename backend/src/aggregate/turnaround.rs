//! Days from request to support.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::stats::{median, Describe};
use crate::models::{Cell, IntoTable, NormalizedRecord};

/// Descriptive statistics of `turnaround_days`, exported as one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnaroundSummary(pub Describe);

/// Median turnaround of the applications requested in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    /// First day of the month.
    pub request_month: NaiveDate,
    pub turnaround_days: f64,
}

/// `(request_date, turnaround_days)` for records with both dates.
fn turnarounds(records: &[NormalizedRecord]) -> impl Iterator<Item = (NaiveDate, i64)> + '_ {
    records.iter().filter_map(|r| {
        let days = r.turnaround_days()?;
        Some((r.request_date?, days))
    })
}

pub fn turnaround_summary(records: &[NormalizedRecord]) -> TurnaroundSummary {
    let days: Vec<f64> = turnarounds(records).map(|(_, d)| d as f64).collect();
    TurnaroundSummary(Describe::of(&days))
}

/// Median turnaround per request month, oldest month first.
pub fn turnaround_timeline(records: &[NormalizedRecord]) -> Vec<TimelinePoint> {
    let mut months: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (requested, days) in turnarounds(records) {
        if let Some(month) = requested.with_day(1) {
            months.entry(month).or_default().push(days as f64);
        }
    }

    months
        .into_iter()
        .map(|(request_month, days)| TimelinePoint {
            request_month,
            turnaround_days: median(&days),
        })
        .collect()
}

impl IntoTable for TurnaroundSummary {
    const COLUMNS: &'static [&'static str] =
        &["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    fn cells(&self) -> Vec<Cell> {
        let d = &self.0;
        vec![
            Cell::Int(d.count as i64),
            Cell::Number(d.mean),
            Cell::Number(d.std),
            Cell::Number(d.min),
            Cell::Number(d.q25),
            Cell::Number(d.q50),
            Cell::Number(d.q75),
            Cell::Number(d.max),
        ]
    }
}

impl IntoTable for TimelinePoint {
    const COLUMNS: &'static [&'static str] = &["request_month", "turnaround_days"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Date(self.request_month),
            Cell::Number(self.turnaround_days),
        ]
    }
}
