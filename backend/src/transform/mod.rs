//! Transformation module.
//!
//! - Dates: best-effort date parsing for free-form spreadsheet cells
//! - Normalize: raw rows to [`NormalizedRecord`](crate::models::NormalizedRecord)s
//! - Pipeline: load, normalize, aggregate and export in one call

pub mod dates;
pub mod normalize;
pub mod pipeline;

pub use dates::parse_date;
pub use normalize::{normalize, Normalized};
pub use pipeline::{prepare, run, Prepared, RunSummary};
