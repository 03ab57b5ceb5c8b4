//! Unspent award balances by application year and assistance type.

use std::collections::BTreeMap;

use crate::models::{Cell, IntoTable, NormalizedRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct UnderutilizationRow {
    pub application_year: i32,
    pub assistance_type: String,
    pub count: usize,
    pub avg_unused: f64,
}

/// Count and mean `remaining_balance` per (year, assistance type).
///
/// Only records carrying both keys are grouped; rows come out in key order.
pub fn underutilization(records: &[NormalizedRecord]) -> Vec<UnderutilizationRow> {
    let mut groups: BTreeMap<(i32, &str), (usize, f64)> = BTreeMap::new();
    for r in records {
        if let (Some(year), Some(kind)) = (r.application_year, r.assistance_type.as_deref()) {
            let entry = groups.entry((year, kind)).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += r.remaining_balance;
        }
    }

    groups
        .into_iter()
        .map(|((application_year, kind), (count, total))| UnderutilizationRow {
            application_year,
            assistance_type: kind.to_string(),
            count,
            avg_unused: total / count as f64,
        })
        .collect()
}

impl IntoTable for UnderutilizationRow {
    const COLUMNS: &'static [&'static str] =
        &["application_year", "assistance_type", "count", "avg_unused"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.application_year as i64),
            Cell::text(&self.assistance_type),
            Cell::Int(self.count as i64),
            Cell::Number(self.avg_unused),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;

    fn balance(year: Option<i32>, kind: Option<&str>, remaining: f64) -> NormalizedRecord {
        NormalizedRecord {
            application_year: year,
            assistance_type: kind.map(str::to_string),
            remaining_balance: remaining,
            ..record()
        }
    }

    #[test]
    fn test_count_and_mean() {
        let records = vec![
            balance(Some(2022), Some("Gas"), 10.0),
            balance(Some(2022), Some("Gas"), 30.0),
            balance(Some(2021), Some("Housing"), 5.0),
        ];
        let rows = underutilization(&records);
        assert_eq!(
            rows,
            vec![
                UnderutilizationRow {
                    application_year: 2021,
                    assistance_type: "Housing".into(),
                    count: 1,
                    avg_unused: 5.0,
                },
                UnderutilizationRow {
                    application_year: 2022,
                    assistance_type: "Gas".into(),
                    count: 2,
                    avg_unused: 20.0,
                },
            ]
        );
    }

    #[test]
    fn test_counts_cover_records_with_both_keys() {
        let records = vec![
            balance(Some(2022), Some("Gas"), 1.0),
            balance(None, Some("Gas"), 1.0),
            balance(Some(2022), None, 1.0),
            balance(Some(2023), Some("Food"), 1.0),
        ];
        let total: usize = underutilization(&records).iter().map(|r| r.count).sum();
        let keyed = records
            .iter()
            .filter(|r| r.application_year.is_some() && r.assistance_type.is_some())
            .count();
        assert_eq!(total, keyed);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(underutilization(&[]).is_empty());
    }
}
