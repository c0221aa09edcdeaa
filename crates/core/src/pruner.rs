//! Removal of standby directories that were never used.

use crate::enumerator::{is_empty_dir, list_for_date};
use crate::{StandbyConfig, StandbyError, StandbyResult};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories handled by a single [`prune_obsolete`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Empty directories that were removed.
    pub deleted: Vec<PathBuf>,
    /// Directories inside the window that hold content and were kept.
    pub retained: Vec<PathBuf>,
}

/// The dates eligible for pruning: `days` consecutive dates going backward,
/// starting the day before `reference_date`.
pub fn prune_window(reference_date: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (1..=u64::from(days))
        .filter_map(|n| reference_date.checked_sub_days(Days::new(n)))
        .collect()
}

/// Deletes the empty standby directories of every date in the prune window.
///
/// Directories with content and directories of dates outside the window are
/// never touched. Dates that have left the window are not revisited, so a
/// directory emptied after that point stays on disk.
///
/// # Errors
///
/// Returns `StandbyError` on the first listing or emptiness check that fails,
/// or [`StandbyError::DeleteFailed`] if a directory gained content between the
/// check and the non-recursive delete.
pub fn prune_obsolete(
    root: &Path,
    reference_date: NaiveDate,
    config: &StandbyConfig,
) -> StandbyResult<PruneReport> {
    let mut report = PruneReport::default();

    for date in prune_window(reference_date, config.prune_window_days()) {
        for path in list_for_date(root, date)? {
            if !is_empty_dir(&path)? {
                report.retained.push(path);
                continue;
            }

            remove_standby(&path)?;
            tracing::info!(path = %path.display(), "Deleted obsolete standby directory");
            report.deleted.push(path);
        }
    }

    Ok(report)
}

/// Removes a directory that was found empty. Never recursive, so a directory
/// that gained content since the check fails instead of losing it.
fn remove_standby(path: &Path) -> StandbyResult<()> {
    fs::remove_dir(path).map_err(|source| StandbyError::DeleteFailed {
        path: path.to_path_buf(),
        source,
    })
}
