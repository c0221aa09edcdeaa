//! Validated watched root directory.
//!
//! A [`StandbyRoot`] is checked once at construction: the path must exist and be
//! a directory. The core never creates roots, so a missing root is reported as
//! a configuration problem before any standby work is attempted.

use crate::allocator::{ensure_standby, EnsureOutcome};
use crate::enumerator::list_for_date;
use crate::pruner::{prune_obsolete, PruneReport};
use crate::{StandbyConfig, StandbyError, StandbyResult};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A watched root directory holding standby directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandbyRoot {
    path: PathBuf,
}

impl StandbyRoot {
    /// Validates and canonicalises `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StandbyError::InvalidRootDirectory`] if the path does not exist,
    /// is not a directory, or cannot be canonicalised.
    pub fn new(path: impl AsRef<Path>) -> StandbyResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(StandbyError::InvalidRootDirectory(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(StandbyError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        let path = path.canonicalize().map_err(|e| {
            StandbyError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// See [`list_for_date`].
    pub fn list_for_date(&self, date: NaiveDate) -> StandbyResult<Vec<PathBuf>> {
        list_for_date(&self.path, date)
    }

    /// See [`ensure_standby`].
    pub fn ensure_standby(
        &self,
        date: NaiveDate,
        config: &StandbyConfig,
    ) -> StandbyResult<EnsureOutcome> {
        ensure_standby(&self.path, date, config)
    }

    /// See [`prune_obsolete`].
    pub fn prune_obsolete(
        &self,
        reference_date: NaiveDate,
        config: &StandbyConfig,
    ) -> StandbyResult<PruneReport> {
        prune_obsolete(&self.path, reference_date, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_root_new_success() {
        let temp = TempDir::new().unwrap();
        let root = StandbyRoot::new(temp.path()).unwrap();
        assert_eq!(root.path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_root_not_exists() {
        let temp = TempDir::new().unwrap();
        let result = StandbyRoot::new(temp.path().join("non-existent"));
        assert!(matches!(result, Err(StandbyError::InvalidRootDirectory(_))));
    }

    #[test]
    fn test_root_not_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "not a directory").unwrap();

        let result = StandbyRoot::new(&file);
        assert!(matches!(result, Err(StandbyError::InvalidRootDirectory(_))));
    }
}
