//! Delimited artifact writer.

use std::path::Path;

use crate::error::{ExportError, ExportResult};
use crate::models::Table;

/// Write `table` as comma-separated text with a header row.
pub fn write_table(path: &Path, table: &Table) -> ExportResult<()> {
    let mut writer = ::csv::Writer::from_path(path).map_err(|e| ExportError::write(path, e))?;

    writer
        .write_record(&table.columns)
        .map_err(|e| ExportError::write(path, e))?;
    for row in table.rendered_rows() {
        writer
            .write_record(&row)
            .map_err(|e| ExportError::write(path, e))?;
    }

    writer.flush().map_err(|e| ExportError::write(path, e))
}
