//! Error types for the grant preparation pipeline.
//!
//! Each stage owns its error type and the top-level [`PipelineError`]
//! wraps them:
//!
//! - [`LoadError`] - reading and tokenizing the input file
//! - [`SchemaError`] - required source columns absent at the Normalizer boundary
//! - [`ExportError`] - persisting derived artifacts
//! - [`ConfigError`] - invalid configuration values
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Per-value parsing failures (a bad number, an unreadable date) are not
//! errors. They fall back to zero or a missing marker and are counted in the
//! [`NormalizationReport`](crate::models::NormalizationReport).

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors raised while loading the raw dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input path could not be read.
    #[error("Cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not a known spreadsheet or delimited format.
    #[error("Unsupported input format '{0}' (expected .xlsx, .xls, .xlsm, .xlsb, .ods, .csv, .tsv, .tab or .txt)")]
    UnsupportedFormat(String),

    /// The file could not be tokenized into rows and columns.
    #[error("Invalid tabular structure: {0}")]
    Parse(String),

    /// Errors bubbled up from the workbook reader.
    #[error("Invalid workbook: {0}")]
    Workbook(#[from] calamine::Error),
}

impl LoadError {
    pub fn parse(line: usize, message: impl std::fmt::Display) -> Self {
        if line == 0 {
            LoadError::Parse(message.to_string())
        } else {
            LoadError::Parse(format!("line {}: {}", line, message))
        }
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors raised when the raw table does not carry the expected columns.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// One or more required source columns are absent.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors raised while persisting artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be written.
    #[error("Cannot write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// Errors bubbled up from the Excel writer.
    #[error("Excel write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl ExportError {
    pub fn write(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        ExportError::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while resolving the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sheet selector could not be understood.
    #[error("Invalid sheet selector: {0}")]
    InvalidSheet(String),

    /// Output format is not one of the supported ones.
    #[error("Invalid output format '{0}' (expected csv or xlsx)")]
    InvalidFormat(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loader error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Normalizer schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Exporter error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
