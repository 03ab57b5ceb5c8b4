//! Pipeline configuration.
//!
//! Values are layered: built-in defaults, then environment variables (a
//! `.env` file is loaded by the CLI with dotenvy), then command-line flags.
//!
//! | variable | field |
//! |---|---|
//! | `GRANTPREP_INPUT` | [`PipelineConfig::input_path`] |
//! | `GRANTPREP_OUTPUT_DIR` | [`PipelineConfig::output_dir`] |
//! | `GRANTPREP_SHEET` | [`PipelineConfig::sheet`] (name or zero-based index) |
//! | `GRANTPREP_FORMAT` | [`PipelineConfig::format`] (`csv` or `xlsx`) |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::OutputFormat;
use crate::parser::SheetSelector;

pub const DEFAULT_INPUT: &str = "data/raw/Cancer.xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";

pub const ENV_INPUT: &str = "GRANTPREP_INPUT";
pub const ENV_OUTPUT_DIR: &str = "GRANTPREP_OUTPUT_DIR";
pub const ENV_SHEET: &str = "GRANTPREP_SHEET";
pub const ENV_FORMAT: &str = "GRANTPREP_FORMAT";

/// Options for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw dataset (spreadsheet or delimited text)
    pub input_path: PathBuf,

    /// Directory receiving the artifacts
    pub output_dir: PathBuf,

    /// Worksheet to read; first sheet when unset
    pub sheet: Option<SheetSelector>,

    /// Artifact file format
    pub format: OutputFormat,

    /// Also export the `data_quality` artifact
    pub diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sheet: None,
            format: OutputFormat::Csv,
            diagnostics: true,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(input) = var(ENV_INPUT) {
            config.input_path = PathBuf::from(input);
        }
        if let Some(dir) = var(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(sheet) = var(ENV_SHEET) {
            config.sheet = Some(parse_sheet(&sheet)?);
        }
        if let Some(format) = var(ENV_FORMAT) {
            config.format = format.parse()?;
        }

        Ok(config)
    }
}

/// A zero-based index when numeric, otherwise a sheet name.
pub fn parse_sheet(value: &str) -> Result<SheetSelector, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidSheet("empty sheet name".to_string()));
    }
    Ok(match value.parse::<usize>() {
        Ok(index) => SheetSelector::Index(index),
        Err(_) => SheetSelector::Name(value.to_string()),
    })
}
