use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::mapping::{MappingEntry, MappingTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyTarget,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameFailure {
    SourceNotFound,
    AlreadyExists,
    PermissionDenied,
    Other(String),
}

impl std::fmt::Display for RenameFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameFailure::SourceNotFound => write!(f, "source file not found"),
            RenameFailure::AlreadyExists => write!(f, "target already exists"),
            RenameFailure::PermissionDenied => write!(f, "permission denied"),
            RenameFailure::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    Renamed,
    Skipped(SkipReason),
    Failed(RenameFailure),
}

#[derive(Debug, Clone)]
pub struct RenameResult {
    pub entry: MappingEntry,
    pub status: RenameStatus,
}

#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub results: Vec<RenameResult>,
}

impl RenameReport {
    pub fn renamed(&self) -> usize {
        self.count(|s| matches!(s, RenameStatus::Renamed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RenameStatus::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RenameStatus::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&MappingEntry, &RenameFailure)> {
        self.results.iter().filter_map(|r| match &r.status {
            RenameStatus::Failed(failure) => Some((&r.entry, failure)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&RenameStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}

/// Applies a mapping table to the files of one directory.
#[derive(Debug)]
pub struct RenameEngine {
    directory: PathBuf,
}

impl RenameEngine {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Rename every entry in table order. Individual failures are recorded
    /// in the report and never stop the batch.
    pub fn apply(&self, table: &MappingTable) -> RenameReport {
        info!(directory = %self.directory.display(), entries = table.len(), "renaming files");

        let results = table
            .iter()
            .map(|entry| RenameResult {
                entry: entry.clone(),
                status: self.rename_entry(entry),
            })
            .collect();

        RenameReport { results }
    }

    pub fn rename_entry(&self, entry: &MappingEntry) -> RenameStatus {
        let original = entry.original_name();
        let new_name = entry.new_name();

        if new_name.is_empty() {
            debug!(original, "no new name, skipping");
            return RenameStatus::Skipped(SkipReason::EmptyTarget);
        }
        if new_name == original {
            debug!(original, "name unchanged, skipping");
            return RenameStatus::Skipped(SkipReason::Unchanged);
        }

        let from = self.directory.join(original);
        let to = self.directory.join(new_name);

        let status = if fs::symlink_metadata(&from).is_err() {
            RenameStatus::Failed(RenameFailure::SourceNotFound)
        } else if fs::symlink_metadata(&to).is_ok() {
            RenameStatus::Failed(RenameFailure::AlreadyExists)
        } else {
            match fs::rename(&from, &to) {
                Ok(()) => RenameStatus::Renamed,
                Err(e) => RenameStatus::Failed(classify_io_error(&e)),
            }
        };

        match &status {
            RenameStatus::Renamed => debug!(original, new_name, "renamed"),
            RenameStatus::Failed(failure) => {
                warn!(original, new_name, error = %failure, "rename failed, continuing with remaining files")
            }
            RenameStatus::Skipped(_) => {}
        }

        status
    }
}

fn classify_io_error(error: &std::io::Error) -> RenameFailure {
    match error.kind() {
        ErrorKind::NotFound => RenameFailure::SourceNotFound,
        ErrorKind::AlreadyExists => RenameFailure::AlreadyExists,
        ErrorKind::PermissionDenied => RenameFailure::PermissionDenied,
        _ => RenameFailure::Other(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).unwrap();
    }

    #[test]
    fn test_rename_simple() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "株式会社.txt");

        let engine = RenameEngine::new(dir.path());
        let status = engine.rename_entry(&MappingEntry::new("株式会社.txt", "Corporation.txt"));

        assert_eq!(status, RenameStatus::Renamed);
        assert!(dir.path().join("Corporation.txt").exists());
        assert!(!dir.path().join("株式会社.txt").exists());
    }

    #[test]
    fn test_empty_or_identical_target_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");
        let engine = RenameEngine::new(dir.path());

        assert_eq!(
            engine.rename_entry(&MappingEntry::new("a.txt", "")),
            RenameStatus::Skipped(SkipReason::EmptyTarget)
        );
        assert_eq!(
            engine.rename_entry(&MappingEntry::new("a.txt", "a.txt")),
            RenameStatus::Skipped(SkipReason::Unchanged)
        );
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_existing_target_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b.txt");
        let engine = RenameEngine::new(dir.path());

        let status = engine.rename_entry(&MappingEntry::new("a.txt", "b.txt"));

        assert_eq!(status, RenameStatus::Failed(RenameFailure::AlreadyExists));
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "b.txt");
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_missing_source_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "one.txt");
        touch(dir.path(), "three.txt");

        let table: MappingTable = [
            MappingEntry::new("one.txt", "1.txt"),
            MappingEntry::new("two.txt", "2.txt"),
            MappingEntry::new("three.txt", "3.txt"),
            MappingEntry::new("three.txt", ""),
        ]
        .into_iter()
        .collect();

        let report = RenameEngine::new(dir.path()).apply(&table);

        assert_eq!(report.results.len(), 4);
        assert_eq!(report.renamed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures[0].0.original_name(), "two.txt");
        assert_eq!(failures[0].1, &RenameFailure::SourceNotFound);

        assert!(dir.path().join("1.txt").exists());
        assert!(dir.path().join("3.txt").exists());
        assert!(!dir.path().join("2.txt").exists());
    }

    #[test]
    fn test_classify_io_error() {
        let err = std::io::Error::from(ErrorKind::PermissionDenied);
        assert_eq!(classify_io_error(&err), RenameFailure::PermissionDenied);
        let err = std::io::Error::other("boom");
        assert_eq!(classify_io_error(&err), RenameFailure::Other("boom".to_string()));
    }
}
