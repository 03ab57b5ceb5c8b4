//! Loader: reads the raw grant dataset into an untyped [`RawTable`].
//!
//! The format is chosen from the file extension:
//!
//! | extension | reader |
//! |---|---|
//! | `.xlsx` `.xlsm` `.xlsb` `.xls` `.ods` | [`workbook`] (first sheet unless overridden) |
//! | `.csv` | [`delimited`], comma |
//! | `.tsv` `.tab` | [`delimited`], tab |
//! | `.txt` | [`delimited`], delimiter detected from the header line |
//!
//! No schema validation happens here; column presence is checked by
//! [`crate::validation`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

pub mod delimited;
pub mod workbook;

pub use delimited::{decode_content, detect_delimiter, detect_encoding, parse_delimited};
pub use workbook::read_workbook;

/// Rows as ingested: headers plus string cells, one row per application.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub origin: Origin,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// How a [`RawTable`] was read.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    Delimited { encoding: String, delimiter: char },
    Workbook { sheet: String },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Delimited { encoding, delimiter } => {
                write!(f, "delimited text ({}, '{}')", encoding, format_delimiter(*delimiter))
            }
            Origin::Workbook { sheet } => write!(f, "workbook sheet '{}'", sheet),
        }
    }
}

/// Which worksheet to read from a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{}", i),
            SheetSelector::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Input format resolved from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    /// `None` means the delimiter is detected from the content.
    Delimited(Option<char>),
}

impl InputFormat {
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Delimited(Some(','))),
            "tsv" | "tab" => Ok(InputFormat::Delimited(Some('\t'))),
            "txt" => Ok(InputFormat::Delimited(None)),
            "" => Err(LoadError::UnsupportedFormat("<none>".to_string())),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load a dataset from `path`, dispatching on its extension.
///
/// `sheet` only applies to workbooks and defaults to the first sheet.
pub fn load(path: &Path, sheet: Option<&SheetSelector>) -> LoadResult<RawTable> {
    match InputFormat::from_path(path)? {
        InputFormat::Workbook => read_workbook(path, sheet.cloned().unwrap_or_default()),
        InputFormat::Delimited(delimiter) => {
            let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_delimited(&bytes, delimiter)
        }
    }
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
