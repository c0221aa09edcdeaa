//! Standby allocation.
//!
//! Makes sure the newest directory of a date is an empty one, rolling over to
//! the next index once a producer has written into the current directory.

use crate::enumerator::{is_empty_dir, list_entries_for_date};
use crate::{StandbyConfig, StandbyError, StandbyResult};
use chrono::NaiveDate;
use serde::Serialize;
use standby_naming::{StandbyIndex, StandbyName};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What [`ensure_standby`] found or did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnsureOutcome {
    /// A new, empty directory was created.
    Created { path: PathBuf },
    /// The newest directory is still empty and remains the standby.
    StandbyAvailable { path: PathBuf },
    /// The date already holds as many directories as allowed.
    CapReached { path: PathBuf },
    /// The target directory appeared before it could be created.
    AlreadyExists { path: PathBuf },
}

impl EnsureOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path }
            | Self::StandbyAvailable { path }
            | Self::CapReached { path }
            | Self::AlreadyExists { path } => path,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Ensures an empty standby directory exists under `root` for `date`.
///
/// - no directory for `date` yet: index `01` is created
/// - newest directory empty: nothing to do
/// - newest directory used: the next index is created, unless the cap in
///   `config` is reached or the target already exists
///
/// At most one directory is created per call and nothing is ever deleted.
///
/// # Errors
///
/// Returns `StandbyError` if `root` cannot be listed, the newest directory
/// cannot be read, or creating the new directory fails for any reason other
/// than it already existing.
pub fn ensure_standby(
    root: &Path,
    date: NaiveDate,
    config: &StandbyConfig,
) -> StandbyResult<EnsureOutcome> {
    let entries = list_entries_for_date(root, date)?;

    let Some(latest) = entries.last() else {
        let target = root.join(StandbyName::new(date, StandbyIndex::FIRST)?.to_string());
        return create_standby(target);
    };

    let max = config.max_directories_per_date();
    if latest.index.is_some_and(|index| index.get() >= max) {
        tracing::debug!(path = %latest.path.display(), "Directory cap reached");
        return Ok(EnsureOutcome::CapReached {
            path: latest.path.clone(),
        });
    }

    if is_empty_dir(&latest.path)? {
        tracing::debug!(path = %latest.path.display(), "Standby directory still empty");
        return Ok(EnsureOutcome::StandbyAvailable {
            path: latest.path.clone(),
        });
    }

    // A used `00` directory rolls over to the first index.
    let next = match latest.index {
        None => Some(StandbyIndex::FIRST),
        Some(index) => index.next(),
    };
    let next = match next {
        Some(next) if next.get() < max => next,
        _ => {
            tracing::debug!(
                path = %latest.path.display(),
                "Directory cap reached, not rolling over"
            );
            return Ok(EnsureOutcome::CapReached {
                path: latest.path.clone(),
            });
        }
    };

    let target = root.join(StandbyName::new(date, next)?.to_string());
    if target.exists() {
        tracing::debug!(path = %target.display(), "Rollover target already exists");
        return Ok(EnsureOutcome::AlreadyExists { path: target });
    }

    create_standby(target)
}

fn create_standby(target: PathBuf) -> StandbyResult<EnsureOutcome> {
    match fs::create_dir(&target) {
        Ok(()) => {
            tracing::info!(path = %target.display(), "Created standby directory");
            Ok(EnsureOutcome::Created { path: target })
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(path = %target.display(), "Standby directory already exists");
            Ok(EnsureOutcome::AlreadyExists { path: target })
        }
        Err(e) => Err(StandbyError::Io {
            path: target,
            source: e,
        }),
    }
}
