//! Listing of the standby directories that belong to one date.

use crate::{StandbyError, StandbyResult};
use chrono::NaiveDate;
use standby_naming::{parse_suffix, search_pattern, StandbyIndex, NAME_LEN};
use std::fs;
use std::path::{Path, PathBuf};

/// A standby directory found under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StandbyEntry {
    /// `None` for a `00` suffix, which sorts before the first index.
    pub(crate) index: Option<StandbyIndex>,
    pub(crate) path: PathBuf,
}

/// Lists the standby directories of `date` directly under `root`, lowest index first.
///
/// Only real directories whose name matches `YYYY-MM-DD-??` for `date`, is
/// exactly 13 characters long and ends in a two-digit number (`00` included)
/// are returned. Every other entry is skipped silently. Symlinks are never
/// followed.
///
/// # Errors
///
/// Returns [`StandbyError::Io`] if `root` cannot be read.
pub fn list_for_date(root: &Path, date: NaiveDate) -> StandbyResult<Vec<PathBuf>> {
    Ok(list_entries_for_date(root, date)?
        .into_iter()
        .map(|entry| entry.path)
        .collect())
}

pub(crate) fn list_entries_for_date(
    root: &Path,
    date: NaiveDate,
) -> StandbyResult<Vec<StandbyEntry>> {
    let pattern = search_pattern(date);
    let mut found: Vec<(String, StandbyEntry)> = Vec::new();

    for entry in fs::read_dir(root).map_err(StandbyError::io(root))? {
        let entry = entry.map_err(StandbyError::io(root))?;

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::warn!(
                path = %entry.path().display(),
                "Skipping non-UTF8 directory name"
            );
            continue;
        };

        if !pattern.matches(name) || name.len() != NAME_LEN {
            continue;
        }

        let Some(display) = parse_suffix(name) else {
            continue;
        };
        let index = StandbyIndex::from_one_based(display).ok();

        let path = entry.path();
        let file_type = entry.file_type().map_err(StandbyError::io(&path))?;
        if !file_type.is_dir() {
            continue;
        }

        found.push((name.to_owned(), StandbyEntry { index, path }));
    }

    // Ordinal order on the zero-padded names is index order.
    found.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    Ok(found.into_iter().map(|(_, entry)| entry).collect())
}

/// Returns true if `path` has no entries of any kind.
pub fn is_empty_dir(path: &Path) -> StandbyResult<bool> {
    let mut entries = fs::read_dir(path).map_err(StandbyError::io(path))?;
    match entries.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(e)) => Err(StandbyError::io(path)(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_list_empty_root() {
        let temp = TempDir::new().unwrap();
        let listed = list_for_date(temp.path(), date(2024, 1, 10)).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn test_list_orders_by_index() {
        let temp = TempDir::new().unwrap();
        for name in ["2024-01-10-10", "2024-01-10-02", "2024-01-10-01", "2024-01-10-09"] {
            fs::create_dir(temp.path().join(name)).unwrap();
        }

        let listed = list_for_date(temp.path(), date(2024, 1, 10)).unwrap();
        assert_eq!(
            names(&listed),
            vec!["2024-01-10-01", "2024-01-10-02", "2024-01-10-09", "2024-01-10-10"]
        );
    }

    #[test]
    fn test_list_filters_other_dates_and_malformed_names() {
        let temp = TempDir::new().unwrap();
        for name in [
            "2024-01-10-01",
            "2024-01-11-01",
            "2024-01-10-AB",
            "2024-01-10-013",
            "2024-01-10-+1",
            "2024-01-10",
            "incoming",
        ] {
            fs::create_dir(temp.path().join(name)).unwrap();
        }

        let listed = list_for_date(temp.path(), date(2024, 1, 10)).unwrap();
        assert_eq!(names(&listed), vec!["2024-01-10-01"]);
    }

    #[test]
    fn test_list_skips_regular_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2024-01-10-01"), "not a directory").unwrap();
        fs::create_dir(temp.path().join("2024-01-10-02")).unwrap();

        let listed = list_for_date(temp.path(), date(2024, 1, 10)).unwrap();
        assert_eq!(names(&listed), vec!["2024-01-10-02"]);
    }

    #[test]
    fn test_list_entries_carry_index() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("2024-01-10-05")).unwrap();

        let entries = list_entries_for_date(temp.path(), date(2024, 1, 10)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index.map(StandbyIndex::get), Some(4));
    }

    #[test]
    fn test_list_includes_zero_suffix_first() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("2024-01-10-01")).unwrap();
        fs::create_dir(temp.path().join("2024-01-10-00")).unwrap();

        let entries = list_entries_for_date(temp.path(), date(2024, 1, 10)).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].path.ends_with("2024-01-10-00"));
        assert_eq!(entries[0].index, None);
        assert_eq!(entries[1].index, Some(StandbyIndex::FIRST));
    }

    #[test]
    fn test_list_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let result = list_for_date(&missing, date(2024, 1, 10));
        assert!(matches!(result, Err(StandbyError::Io { .. })));
    }

    #[test]
    fn test_is_empty_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("d");
        fs::create_dir(&dir).unwrap();
        assert!(is_empty_dir(&dir).unwrap());

        fs::create_dir(dir.join("nested")).unwrap();
        assert!(!is_empty_dir(&dir).unwrap());
    }

    #[test]
    fn test_is_empty_dir_counts_hidden_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".partial"), b"").unwrap();
        assert!(!is_empty_dir(temp.path()).unwrap());
    }
}
