//! High-level pipeline API: load, normalize, aggregate, export.
//!
//! # Example
//!
//! ```rust,ignore
//! use grantprep::{run, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = run(&PipelineConfig::from_env()?)?;
//!     println!("Wrote {} artifacts", summary.artifacts.len());
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use crate::aggregate::DerivedViews;
use crate::config::PipelineConfig;
use crate::error::{PipelineResult, SchemaError};
use crate::export::{Artifact, ArtifactName, Exporter};
use crate::logs::{
    log_error, log_info, log_info_indent, log_success, log_warning, log_warning_indent,
};
use crate::models::{NormalizationReport, NormalizedRecord, Table};
use crate::parser::{self, Origin, RawTable};
use crate::transform::normalize::normalize;

/// Normalized records and every view derived from them.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub records: Vec<NormalizedRecord>,
    pub report: NormalizationReport,
    pub views: DerivedViews,
}

impl Prepared {
    /// Tables for every artifact, in export order.
    pub fn artifacts(&self, diagnostics: bool) -> Vec<Artifact> {
        let views = &self.views;
        let mut artifacts = vec![
            Artifact::new(ArtifactName::DataCleaned, Table::from_rows(&self.records)),
            Artifact::new(
                ArtifactName::ReadyForReview,
                Table::from_rows(&views.ready_for_review),
            ),
            Artifact::new(
                ArtifactName::SupportByDemographics,
                Table::from_rows(&views.support_by_demographics),
            ),
            Artifact::new(
                ArtifactName::Underutilization,
                Table::from_rows(&views.underutilization),
            ),
            Artifact::new(
                ArtifactName::TurnaroundSummary,
                Table::single(&views.turnaround_summary),
            ),
            Artifact::new(
                ArtifactName::TurnaroundTimeline,
                Table::from_rows(&views.turnaround_timeline),
            ),
            Artifact::new(
                ArtifactName::HighLevelSummary,
                Table::single(&views.high_level_summary),
            ),
        ];
        if diagnostics {
            artifacts.push(Artifact::new(
                ArtifactName::DataQuality,
                Table::from_rows(&self.report.issues()),
            ));
        }
        artifacts
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub origin: Origin,
    pub rows: usize,
    pub report: NormalizationReport,
    /// Exported files, in export order.
    pub artifacts: Vec<PathBuf>,
}

/// Normalize a raw table and compute all views. No I/O.
pub fn prepare(table: RawTable) -> Result<Prepared, SchemaError> {
    let normalized = normalize(table)?;
    let records = normalized.records;
    let mut report = normalized.report;

    for record in &records {
        match record.turnaround_days() {
            None => report.turnaround_excluded += 1,
            Some(days) if days < 0 => report.negative_turnarounds += 1,
            Some(_) => {}
        }
    }

    let views = DerivedViews::compute(&records);
    Ok(Prepared { records, report, views })
}

/// Run the whole pipeline described by `config`.
///
/// Any stage failure aborts the run. Artifacts from an earlier successful
/// run are only replaced once every new artifact has been written.
pub fn run(config: &PipelineConfig) -> PipelineResult<RunSummary> {
    // Step 1: Load
    log_info(format!("Reading {}...", config.input_path.display()));
    let table = parser::load(&config.input_path, config.sheet.as_ref()).map_err(failed)?;
    let origin = table.origin.clone();
    let rows = table.len();
    log_success(format!("Read {} rows from {}", rows, origin));
    log_info_indent(format!("{} columns", table.headers.len()), 1);

    // Step 2: Normalize + aggregate
    log_info("Normalizing records...");
    let prepared = prepare(table).map_err(failed)?;
    report_quality(&prepared.report);
    log_success(format!(
        "{} ready for review, {} demographic groups, {} utilization groups, {} timeline months",
        prepared.views.ready_for_review.len(),
        prepared.views.support_by_demographics.len(),
        prepared.views.underutilization.len(),
        prepared.views.turnaround_timeline.len(),
    ));

    // Step 3: Export
    let exporter = Exporter::new(&config.output_dir, config.format);
    log_info(format!("Exporting to {}...", exporter.dir().display()));
    let artifacts = exporter
        .export_all(&prepared.artifacts(config.diagnostics))
        .map_err(failed)?;
    for path in &artifacts {
        log_info_indent(path.display().to_string(), 1);
    }
    log_success(format!("Wrote {} artifacts", artifacts.len()));

    Ok(RunSummary {
        origin,
        rows,
        report: prepared.report,
        artifacts,
    })
}

fn failed<E: std::fmt::Display>(err: E) -> E {
    log_error(err.to_string());
    err
}

/// Surface silent fallbacks as warnings.
fn report_quality(report: &NormalizationReport) {
    let zeroed = report.zero_fallbacks();
    if zeroed > 0 {
        log_warning(format!("{} numeric value(s) treated as zero", zeroed));
        for (field, fallbacks) in [
            ("award_amount", &report.award_amount),
            ("income", &report.income),
            ("remaining_balance", &report.remaining_balance),
        ] {
            if fallbacks.total() > 0 {
                log_warning_indent(
                    format!(
                        "{}: {} blank, {} unparseable",
                        field, fallbacks.blank, fallbacks.coerced
                    ),
                    1,
                );
            }
        }
    }
    if report.unparsed_request_dates > 0 || report.unparsed_support_dates > 0 {
        log_warning(format!(
            "{} request date(s) and {} support date(s) could not be parsed",
            report.unparsed_request_dates, report.unparsed_support_dates
        ));
    }
    if !report.support_date_column {
        log_warning("No support date column; turnaround views will be empty");
    }
    if report.turnaround_excluded > 0 {
        log_info_indent(
            format!(
                "{} of {} record(s) excluded from turnaround statistics",
                report.turnaround_excluded, report.rows
            ),
            1,
        );
    }
    if report.negative_turnarounds > 0 {
        log_warning(format!(
            "{} record(s) supported before their request date",
            report.negative_turnarounds
        ));
    }
}
