//! Exporter: writes derived views as named tabular artifacts.
//!
//! Each artifact lands at `<dir>/<name>.<ext>` and replaces any earlier file
//! of the same name. Writes are staged: every artifact is written to a
//! `.tmp` sibling first and only renamed into place once all of them were
//! written, so a failing export leaves the previous artifacts untouched.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExportError, ExportResult};
use crate::models::Table;

pub mod csv;
pub mod xlsx;

/// Logical artifact names consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactName {
    DataCleaned,
    ReadyForReview,
    SupportByDemographics,
    Underutilization,
    TurnaroundSummary,
    TurnaroundTimeline,
    HighLevelSummary,
    DataQuality,
}

impl ArtifactName {
    pub const ALL: [ArtifactName; 8] = [
        ArtifactName::DataCleaned,
        ArtifactName::ReadyForReview,
        ArtifactName::SupportByDemographics,
        ArtifactName::Underutilization,
        ArtifactName::TurnaroundSummary,
        ArtifactName::TurnaroundTimeline,
        ArtifactName::HighLevelSummary,
        ArtifactName::DataQuality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactName::DataCleaned => "data_cleaned",
            ArtifactName::ReadyForReview => "ready_for_review",
            ArtifactName::SupportByDemographics => "support_by_demographics",
            ArtifactName::Underutilization => "underutilization",
            ArtifactName::TurnaroundSummary => "turnaround_summary",
            ArtifactName::TurnaroundTimeline => "turnaround_timeline",
            ArtifactName::HighLevelSummary => "high_level_summary",
            ArtifactName::DataQuality => "data_quality",
        }
    }

    pub fn file_name(self, format: OutputFormat) -> String {
        format!("{}.{}", self.as_str(), format.extension())
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File format of exported artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

/// A derived view ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: ArtifactName,
    pub table: Table,
}

impl Artifact {
    pub fn new(name: ArtifactName, table: Table) -> Self {
        Self { name, table }
    }
}

/// Writes artifacts into one output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    format: OutputFormat,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: ArtifactName) -> PathBuf {
        self.dir.join(name.file_name(self.format))
    }

    /// Write every artifact, returning the final paths in input order.
    pub fn export_all(&self, artifacts: &[Artifact]) -> ExportResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ExportError::write(&self.dir, e))?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let target = self.path_for(artifact.name);
            let tmp = staging_path(&target);
            staged.push((tmp.clone(), target));
            if let Err(e) = self.write_one(&tmp, artifact) {
                discard(&staged);
                return Err(e);
            }
        }

        for (i, (tmp, target)) in staged.iter().enumerate() {
            if let Err(e) = std::fs::rename(tmp, target) {
                discard(&staged[i..]);
                return Err(ExportError::write(target, e));
            }
        }

        Ok(staged.into_iter().map(|(_, target)| target).collect())
    }

    fn write_one(&self, path: &Path, artifact: &Artifact) -> ExportResult<()> {
        match self.format {
            OutputFormat::Csv => self::csv::write_table(path, &artifact.table),
            OutputFormat::Xlsx => {
                self::xlsx::write_table(path, artifact.name.as_str(), &artifact.table)
            }
        }
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = std::fs::remove_file(tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table {
            columns: vec!["location".into(), "award_amount".into()],
            rows: vec![
                vec![Cell::text("Omaha, NE"), Cell::Number(150.0)],
                vec![Cell::text("Lincoln, NE"), Cell::Number(f64::NAN)],
            ],
        }
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(ArtifactName::ALL.len(), 8);
        assert_eq!(
            ArtifactName::SupportByDemographics.file_name(OutputFormat::Csv),
            "support_by_demographics.csv"
        );
        assert_eq!(ArtifactName::DataQuality.to_string(), "data_quality");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert!(matches!(
            "parquet".parse::<OutputFormat>(),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_export_overwrites_and_leaves_no_staging_files() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("processed"), OutputFormat::Csv);
        let artifact = Artifact::new(ArtifactName::SupportByDemographics, sample());

        exporter.export_all(&[artifact.clone()]).unwrap();
        let paths = exporter.export_all(&[artifact]).unwrap();

        assert_eq!(paths, vec![exporter.path_for(ArtifactName::SupportByDemographics)]);
        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(content, "location,award_amount\n\"Omaha, NE\",150\n\"Lincoln, NE\",\n");

        let names: Vec<String> = std::fs::read_dir(exporter.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["support_by_demographics.csv"]);
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let exporter = Exporter::new(&blocker, OutputFormat::Csv);
        let err = exporter
            .export_all(&[Artifact::new(ArtifactName::DataCleaned, sample())])
            .unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn test_xlsx_export() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path(), OutputFormat::Xlsx);
        let paths = exporter
            .export_all(&[Artifact::new(ArtifactName::Underutilization, sample())])
            .unwrap();
        assert!(paths[0].ends_with("underutilization.xlsx"));
        assert!(std::fs::metadata(&paths[0]).unwrap().len() > 0);
    }
}
