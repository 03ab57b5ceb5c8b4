//! Artifact cache - reuse exported CSV artifacts across reads
//!
//! Used by consumers of the pipeline output (dashboards, notebooks). Entries
//! are keyed by artifact name and invalidated when the file's modification
//! time changes. The pipeline itself never reads through the cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{LoadError, LoadResult};
use crate::export::{ArtifactName, OutputFormat};

/// An exported artifact read back as strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedArtifact {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl LoadedArtifact {
    /// Values of one column, empty when the column does not exist.
    pub fn column(&self, name: &str) -> Vec<&str> {
        match self.columns.iter().position(|c| c == name) {
            Some(i) => self
                .rows
                .iter()
                .map(|row| row.get(i).map(String::as_str).unwrap_or(""))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug)]
struct CachedArtifact {
    modified: SystemTime,
    artifact: LoadedArtifact,
}

/// Memoized reader for the CSV artifacts of one output directory
#[derive(Debug)]
pub struct ArtifactCache {
    dir: PathBuf,
    entries: HashMap<ArtifactName, CachedArtifact>,
    reads: usize,
}

impl ArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: HashMap::new(),
            reads: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the artifact, reading it from disk only when it is not cached
    /// or the file changed since the last read.
    pub fn get(&mut self, name: ArtifactName) -> LoadResult<&LoadedArtifact> {
        let path = self.dir.join(name.file_name(OutputFormat::Csv));
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;

        let cached = match self.entries.entry(name) {
            Entry::Occupied(entry) if entry.get().modified == modified => entry.into_mut(),
            Entry::Occupied(mut entry) => {
                let artifact = read_artifact(&path)?;
                self.reads += 1;
                entry.insert(CachedArtifact { modified, artifact });
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let artifact = read_artifact(&path)?;
                self.reads += 1;
                entry.insert(CachedArtifact { modified, artifact })
            }
        };
        Ok(&cached.artifact)
    }

    pub fn is_cached(&self, name: ArtifactName) -> bool {
        self.entries.contains_key(&name)
    }

    /// Number of disk reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn invalidate(&mut self, name: ArtifactName) {
        self.entries.remove(&name);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn read_artifact(path: &Path) -> LoadResult<LoadedArtifact> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::parse(0, format!("{}: {}", path.display(), e)))?;

    let columns = reader
        .headers()
        .map_err(|e| LoadError::parse(1, e))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::parse(i + 2, e))?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(LoadedArtifact { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write(dir: &Path, name: ArtifactName, content: &str) -> PathBuf {
        let path = dir.join(name.file_name(OutputFormat::Csv));
        fs::write(&path, content).unwrap();
        path
    }

    fn touch(path: &Path, offset_secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs))
            .unwrap();
    }

    #[test]
    fn test_reads_once_while_unchanged() {
        let dir = tempdir().unwrap();
        write(dir.path(), ArtifactName::ReadyForReview, "patient_id,status\nP1,Ready\n");
        let mut cache = ArtifactCache::new(dir.path());

        let first = cache.get(ArtifactName::ReadyForReview).unwrap().clone();
        assert_eq!(first.columns, vec!["patient_id", "status"]);
        assert_eq!(first.column("patient_id"), vec!["P1"]);

        cache.get(ArtifactName::ReadyForReview).unwrap();
        assert_eq!(cache.reads(), 1);
        assert!(cache.is_cached(ArtifactName::ReadyForReview));
    }

    #[test]
    fn test_changed_mtime_invalidates() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), ArtifactName::Underutilization, "count\n1\n");
        touch(&path, 0);
        let mut cache = ArtifactCache::new(dir.path());
        assert_eq!(cache.get(ArtifactName::Underutilization).unwrap().rows, vec![vec!["1"]]);

        write(dir.path(), ArtifactName::Underutilization, "count\n2\n");
        touch(&path, 60);
        assert_eq!(cache.get(ArtifactName::Underutilization).unwrap().rows, vec![vec!["2"]]);
        assert_eq!(cache.reads(), 2);
    }

    #[test]
    fn test_explicit_invalidate() {
        let dir = tempdir().unwrap();
        write(dir.path(), ArtifactName::HighLevelSummary, "total_applications\n3\n");
        let mut cache = ArtifactCache::new(dir.path());
        cache.get(ArtifactName::HighLevelSummary).unwrap();

        cache.invalidate(ArtifactName::HighLevelSummary);
        assert!(!cache.is_cached(ArtifactName::HighLevelSummary));
        cache.get(ArtifactName::HighLevelSummary).unwrap();
        assert_eq!(cache.reads(), 2);
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let dir = tempdir().unwrap();
        let mut cache = ArtifactCache::new(dir.path());
        let err = cache.get(ArtifactName::DataCleaned).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(!cache.is_cached(ArtifactName::DataCleaned));
    }

    #[test]
    fn test_column_lookup_missing() {
        let artifact = LoadedArtifact {
            columns: vec!["a".into()],
            rows: vec![vec!["1".into()]],
        };
        assert!(artifact.column("b").is_empty());
    }
}
