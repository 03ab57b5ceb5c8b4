//! Normalizer: raw export rows to [`NormalizedRecord`]s.
//!
//! One output record per input row. Per-value problems never fail the run:
//!
//! - numbers that are blank, unparseable, non-finite or negative become `0.0`
//! - dates that cannot be parsed become `None`
//!
//! Every fallback is counted in the [`NormalizationReport`].

use crate::error::SchemaError;
use crate::models::{NormalizationReport, NormalizedRecord, NumericFallbacks};
use crate::parser::RawTable;
use crate::transform::dates::parse_date;
use crate::validation::{resolve_columns, ColumnIndex, SourceField};

/// Normalized records plus the diagnostics gathered while building them.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub report: NormalizationReport,
}

/// Why a numeric value was replaced by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFallback {
    Blank,
    Invalid,
}

/// Parse a non-negative amount.
pub fn parse_amount(raw: &str) -> Result<f64, NumericFallback> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(NumericFallback::Blank);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(NumericFallback::Invalid),
    }
}

/// Parse an application year such as `2021` or `2021.0`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let value = raw.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    let number: f64 = value.parse().ok()?;
    if number.is_finite() && number.fract() == 0.0 && number.abs() <= i32::MAX as f64 {
        Some(number as i32)
    } else {
        None
    }
}

/// `"{city}, {state}"` with both parts trimmed; empty parts are kept.
pub fn build_location(city: &str, state: &str) -> String {
    format!("{}, {}", city.trim(), state.trim())
}

/// Normalize every row of `table`.
///
/// Fails only when a required source column is absent.
pub fn normalize(table: RawTable) -> Result<Normalized, SchemaError> {
    let columns = resolve_columns(&table.headers)?;

    let mut report = NormalizationReport {
        rows: table.rows.len(),
        support_date_column: columns.has(SourceField::SupportDate),
        ..Default::default()
    };

    let records = table
        .rows
        .iter()
        .map(|row| normalize_row(row, &columns, &mut report))
        .collect();

    Ok(Normalized { records, report })
}

fn normalize_row(
    row: &[String],
    columns: &ColumnIndex,
    report: &mut NormalizationReport,
) -> NormalizedRecord {
    let cell = |field| source_cell(row, columns, field);

    let request_date = date_field(cell(SourceField::RequestDate), &mut report.unparsed_request_dates);
    if request_date.is_none() {
        report.missing_request_dates += 1;
    }
    let support_date = date_field(cell(SourceField::SupportDate), &mut report.unparsed_support_dates);
    let date_of_birth = date_field(cell(SourceField::BirthDate), &mut report.unparsed_birth_dates);

    let application_year = parse_year(cell(SourceField::AppYear));
    if application_year.is_none() {
        report.missing_application_years += 1;
    }

    let assistance_type = Some(cell(SourceField::AssistanceType))
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string);
    if assistance_type.is_none() {
        report.missing_assistance_types += 1;
    }

    let city = cell(SourceField::City).to_string();
    let state = cell(SourceField::State).to_string();

    NormalizedRecord {
        patient_id: cell(SourceField::PatientId).trim().to_string(),
        request_date,
        support_date,
        status: cell(SourceField::Status).trim().to_lowercase(),
        signed_committee: cell(SourceField::Signed).trim().to_lowercase(),
        award_amount: amount_field(cell(SourceField::Amount), &mut report.award_amount),
        application_year,
        assistance_type,
        date_of_birth,
        gender: cell(SourceField::Gender).to_string(),
        income: amount_field(cell(SourceField::Income), &mut report.income),
        location: build_location(&city, &state),
        city,
        state,
        remaining_balance: amount_field(
            cell(SourceField::RemainingBalance),
            &mut report.remaining_balance,
        ),
    }
}

fn source_cell<'a>(row: &'a [String], columns: &ColumnIndex, field: SourceField) -> &'a str {
    columns
        .get(field)
        .and_then(|idx| row.get(idx))
        .map(String::as_str)
        .unwrap_or("")
}

fn amount_field(raw: &str, fallbacks: &mut NumericFallbacks) -> f64 {
    match parse_amount(raw) {
        Ok(value) => value,
        Err(NumericFallback::Blank) => {
            fallbacks.blank += 1;
            0.0
        }
        Err(NumericFallback::Invalid) => {
            fallbacks.coerced += 1;
            0.0
        }
    }
}

fn date_field(raw: &str, unparsed: &mut usize) -> Option<chrono::NaiveDate> {
    let parsed = parse_date(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        *unparsed += 1;
    }
    parsed
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::parser::{Origin, RawTable};
    use crate::validation::fixtures::full_headers;

    /// Builds a raw table with the canonical headers; each row lists
    /// `(header, value)` overrides and every other cell is blank.
    pub fn raw_table(rows: &[&[(&str, &str)]]) -> RawTable {
        let headers = full_headers();
        let rows = rows
            .iter()
            .map(|overrides| {
                headers
                    .iter()
                    .map(|h| {
                        overrides
                            .iter()
                            .find(|(k, _)| k == h)
                            .map(|(_, v)| v.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        RawTable {
            headers,
            rows,
            origin: Origin::Delimited {
                encoding: "utf-8".into(),
                delimiter: ',',
            },
        }
    }
}
