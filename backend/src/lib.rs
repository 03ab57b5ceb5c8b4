//! # Grantprep - grant application data preparation
//!
//! Grantprep turns a raw grant-application export (spreadsheet or delimited
//! text) into a cleaned dataset plus a fixed set of derived views for
//! reporting and review.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ .xlsx / CSV │────▶│   Loader    │────▶│ Normalizer  │────▶│ Aggregator  │
//! │ (raw export)│     │ (auto-enc)  │     │ (canonical) │     │ (6 views)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                                             ┌──────▼──────┐
//!                                                             │  Exporter   │
//!                                                             │ (artifacts) │
//!                                                             └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grantprep::{run, PipelineConfig};
//!
//! let summary = run(&PipelineConfig::default())?;
//! println!("Normalized {} rows", summary.rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Canonical record, quality report and tabular output
//! - [`parser`] - Spreadsheet and delimited-text loading with auto-detection
//! - [`validation`] - Source column resolution
//! - [`transform`] - Normalization and the pipeline entry point
//! - [`aggregate`] - Derived views
//! - [`export`] - Artifact writing
//! - [`cache`] - Memoized artifact reads for consumers
//! - [`config`] - Layered configuration
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod parser;

// Schema
pub mod validation;

// Transformation
pub mod aggregate;
pub mod transform;

// Output
pub mod export;

// Consumers
pub mod cache;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    ExportError,
    LoadError,
    PipelineError,
    PipelineResult,
    SchemaError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Cell,
    IntoTable,
    NormalizationReport,
    NormalizedRecord,
    QualityIssue,
    Table,
};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{
    load,
    InputFormat,
    Origin,
    RawTable,
    SheetSelector,
};

// =============================================================================
// Re-exports - Views
// =============================================================================

pub use aggregate::{
    DemographicSupportRow,
    DerivedViews,
    HighLevelSummary,
    ReadyForReviewRow,
    TimelinePoint,
    TurnaroundSummary,
    UnderutilizationRow,
    YearlyChange,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use config::PipelineConfig;
pub use export::{Artifact, ArtifactName, Exporter, OutputFormat};
pub use transform::{normalize, prepare, run, Prepared, RunSummary};

// =============================================================================
// Re-exports - Cache
// =============================================================================

pub use cache::{ArtifactCache, LoadedArtifact};
