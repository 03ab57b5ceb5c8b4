//! Spreadsheet reader built on calamine.
//!
//! Cells are rendered to strings so workbooks and delimited files produce
//! the same [`RawTable`] shape. Date cells become ISO dates.

use std::path::Path;

use calamine::{open_workbook_auto, DataType, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use super::{Origin, RawTable, SheetSelector};
use crate::error::{LoadError, LoadResult};
use crate::models::table::format_number;

/// Reads one worksheet of the workbook at `path`.
///
/// The first row is the header row. Rows with no content are skipped.
pub fn read_workbook(path: &Path, sheet: SheetSelector) -> LoadResult<RawTable> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let (name, range) = match sheet {
        SheetSelector::Index(index) => {
            let name = sheet_names.get(index).cloned().ok_or_else(|| {
                LoadError::Parse(format!(
                    "workbook has no sheet #{} ({} sheet(s))",
                    index,
                    sheet_names.len()
                ))
            })?;
            let range = workbook
                .worksheet_range_at(index)
                .ok_or_else(|| LoadError::Parse(format!("cannot read sheet '{}'", name)))??;
            (name, range)
        }
        SheetSelector::Name(name) => {
            let range = workbook.worksheet_range(&name).ok_or_else(|| {
                LoadError::Parse(format!(
                    "missing sheet '{}' (available: {})",
                    name,
                    sheet_names.join(", ")
                ))
            })??;
            (name, range)
        }
    };

    range_to_table(&range, name)
}

fn range_to_table(range: &Range<DataType>, sheet: String) -> LoadResult<RawTable> {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)).trim().to_string())
            .collect(),
        None => return Err(LoadError::Parse(format!("sheet '{}' is empty", sheet))),
    };

    let rows = rows_iter
        .filter(|row| row.iter().any(|cell| !matches!(cell, DataType::Empty)))
        .map(|row| {
            let mut values: Vec<String> = row.iter().map(|c| cell_to_string(Some(c))).collect();
            values.resize(headers.len(), String::new());
            values
        })
        .collect();

    Ok(RawTable {
        headers,
        rows,
        origin: Origin::Workbook { sheet },
    })
}

pub(crate) fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => format_number(*value),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::DateTime(serial)) => excel_serial_to_string(*serial),
        Some(DataType::Error(_)) | Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Last day Excel can represent, 9999-12-31.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Converts an Excel serial date (days since 1899-12-30) to a datetime.
///
/// `None` before the epoch or after 9999-12-31.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_EXCEL_SERIAL + 1.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

fn excel_serial_to_string(serial: f64) -> String {
    match excel_serial_to_datetime(serial) {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_number(serial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_serial_dates() {
        assert_eq!(excel_serial_to_string(44927.0), "2023-01-01");
        assert_eq!(excel_serial_to_string(44927.5), "2023-01-01 12:00:00");
        assert_eq!(excel_serial_to_datetime(-1.0), None);
    }

    #[test]
    fn test_out_of_range_serials() {
        assert_eq!(
            excel_serial_to_datetime(MAX_EXCEL_SERIAL).map(|dt| dt.date()),
            NaiveDate::from_ymd_opt(9999, 12, 31)
        );
        assert_eq!(excel_serial_to_datetime(1e20), None);
        assert_eq!(excel_serial_to_datetime(99_999_999_999_999.0), None);
        assert_eq!(excel_serial_to_string(1e20), "100000000000000000000");
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell_to_string(Some(&DataType::Float(100.0))), "100");
        assert_eq!(cell_to_string(Some(&DataType::Float(12.5))), "12.5");
        assert_eq!(cell_to_string(Some(&DataType::Int(2021))), "2021");
        assert_eq!(cell_to_string(Some(&DataType::String("Ready".into()))), "Ready");
        assert_eq!(cell_to_string(Some(&DataType::Empty)), "");
        assert_eq!(cell_to_string(None), "");
    }

    #[test]
    fn test_range_to_table() {
        let mut range = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), DataType::String("Patient ID#".into()));
        range.set_value((0, 1), DataType::String(" Amount ".into()));
        range.set_value((1, 0), DataType::Int(1));
        range.set_value((1, 1), DataType::Float(250.0));
        range.set_value((3, 0), DataType::Int(2));

        let table = range_to_table(&range, "Sheet1".into()).unwrap();
        assert_eq!(table.headers, vec!["Patient ID#", "Amount"]);
        assert_eq!(table.rows, vec![vec!["1", "250"], vec!["2", ""]]);
        assert_eq!(table.origin, Origin::Workbook { sheet: "Sheet1".into() });
    }

    #[test]
    fn test_empty_range_is_parse_error() {
        let range: Range<DataType> = Range::empty();
        assert!(matches!(
            range_to_table(&range, "Blank".into()),
            Err(LoadError::Parse(_))
        ));
    }
}
