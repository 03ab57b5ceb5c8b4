//! Excel artifact writer.
//!
//! One workbook per artifact with a single sheet named after it. Numbers
//! and integers are written as numeric cells; NaN and missing values stay
//! blank.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::{ExportError, ExportResult};
use crate::models::{Cell, Table};

pub fn write_table(path: &Path, sheet_name: &str, table: &Table) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let c = col_idx as u16;
            match cell {
                Cell::Int(value) => {
                    worksheet.write_number(r, c, *value as f64)?;
                }
                Cell::Number(value) if value.is_finite() => {
                    worksheet.write_number(r, c, *value)?;
                }
                Cell::Number(value) if value.is_nan() => {}
                Cell::Missing => {}
                other => {
                    worksheet.write_string(r, c, &other.render())?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| ExportError::write(path, e))
}
