//! Encoding and decoding of standby directory names.

use crate::{NamingError, NamingResult};
use chrono::{Datelike, NaiveDate};
use standby_types::{StandbyIndex, INDEX_WIDTH};
use std::fmt;

/// `chrono` format string for the date portion of a name.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder describing the date portion.
pub const DATE_PLACEHOLDER: &str = "YYYY-MM-DD";

/// Placeholder describing the index portion.
pub const INDEX_PLACEHOLDER: &str = "XX";

/// Placeholder describing a whole name.
pub const NAME_PLACEHOLDER: &str = "YYYY-MM-DD-XX";

/// Length of every canonical name.
pub const NAME_LEN: usize = NAME_PLACEHOLDER.len();

/// Single-character wildcard used in search patterns.
pub const WILDCARD: char = '?';

const SEPARATOR: char = '-';

/// A decoded standby directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StandbyName {
    date: NaiveDate,
    index: StandbyIndex,
}

impl StandbyName {
    /// Creates a name for `date` and `index`.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::DateOutOfRange`] if the year is not between 0 and 9999,
    /// since such dates would not render in ten characters.
    pub fn new(date: NaiveDate, index: StandbyIndex) -> NamingResult<Self> {
        if !(0..=9999).contains(&date.year()) {
            return Err(NamingError::DateOutOfRange(date));
        }
        Ok(Self { date, index })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn index(&self) -> StandbyIndex {
        self.index
    }
}

impl fmt::Display for StandbyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.date.format(DATE_FORMAT),
            SEPARATOR,
            self.index
        )
    }
}

/// Renders the directory name for `date` and the 0-based `index`.
///
/// # Errors
///
/// Returns [`NamingError::Index`] when `index + 1` needs more than two digits
/// and [`NamingError::DateOutOfRange`] for years outside `0000`..`9999`.
pub fn format_name(date: NaiveDate, index: u8) -> NamingResult<String> {
    let index = StandbyIndex::new(index)?;
    Ok(StandbyName::new(date, index)?.to_string())
}

/// Reads the numeric suffix of a directory name as written on disk.
///
/// The name must be exactly [`NAME_LEN`] ASCII characters and end in two
/// decimal digits. `00` is returned as `Some(0)`: it is a valid suffix that
/// sorts before every allocatable index. The date portion is not inspected.
pub fn parse_suffix(name: &str) -> Option<u8> {
    if name.len() != NAME_LEN || !name.is_ascii() {
        return None;
    }

    let suffix = &name[NAME_LEN - INDEX_WIDTH..];
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    suffix.parse().ok()
}

/// Extracts the 0-based index from a directory name.
///
/// Like [`parse_suffix`], but `00` has no 0-based index and yields `None`.
pub fn try_parse_index(name: &str) -> Option<StandbyIndex> {
    let display = parse_suffix(name)?;
    StandbyIndex::from_one_based(display).ok()
}

/// Wildcard pattern matching every possible name of a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern(String);

impl SearchPattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `name` matches the pattern character for character,
    /// where each [`WILDCARD`] stands for exactly one character.
    pub fn matches(&self, name: &str) -> bool {
        let mut pattern = self.0.chars();
        let mut candidate = name.chars();
        loop {
            match (pattern.next(), candidate.next()) {
                (None, None) => return true,
                (Some(WILDCARD), Some(_)) => {}
                (Some(p), Some(c)) if p == c => {}
                _ => return false,
            }
        }
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the search pattern for `date`, e.g. `2024-01-10-??`.
pub fn search_pattern(date: NaiveDate) -> SearchPattern {
    let wildcards: String = std::iter::repeat(WILDCARD).take(INDEX_WIDTH).collect();
    SearchPattern(format!(
        "{}{}{}",
        date.format(DATE_FORMAT),
        SEPARATOR,
        wildcards
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_name_first_index() {
        assert_eq!(format_name(date(2024, 1, 10), 0).unwrap(), "2024-01-10-01");
    }

    #[test]
    fn test_format_name_last_index() {
        assert_eq!(format_name(date(2024, 12, 31), 98).unwrap(), "2024-12-31-99");
    }

    #[test]
    fn test_format_name_rejects_index_99() {
        let err = format_name(date(2024, 1, 10), 99).unwrap_err();
        assert!(matches!(err, NamingError::Index(_)));
    }

    #[test]
    fn test_format_name_rejects_five_digit_year() {
        let err = format_name(date(10000, 1, 1), 0).unwrap_err();
        assert!(matches!(err, NamingError::DateOutOfRange(_)));
    }

    #[test]
    fn test_format_name_pads_early_years() {
        assert_eq!(format_name(date(987, 3, 4), 4).unwrap(), "0987-03-04-05");
    }

    #[test]
    fn test_every_index_roundtrips_with_fixed_length() {
        let dates = [date(2024, 1, 10), date(2024, 2, 29), date(1999, 12, 31)];
        for d in dates {
            for i in 0..99u8 {
                let name = format_name(d, i).unwrap();
                assert_eq!(name.len(), NAME_LEN);
                assert_eq!(try_parse_index(&name).map(StandbyIndex::get), Some(i));
            }
        }
    }

    #[test]
    fn test_try_parse_index_rejects_non_numeric_suffix() {
        assert!(try_parse_index("2024-01-01-AB").is_none());
        assert!(try_parse_index("2024-01-01-+1").is_none());
        assert!(try_parse_index("2024-01-01- 1").is_none());
    }

    #[test]
    fn test_try_parse_index_rejects_wrong_length() {
        assert!(try_parse_index("2024-01-01-013").is_none());
        assert!(try_parse_index("2024-01-01-1").is_none());
        assert!(try_parse_index("").is_none());
    }

    #[test]
    fn test_try_parse_index_rejects_zero() {
        assert!(try_parse_index("2024-01-01-00").is_none());
    }

    #[test]
    fn test_try_parse_index_rejects_multibyte_names() {
        // 13 bytes but not 13 characters
        assert!(try_parse_index("2024-01-é-01").is_none());
    }

    #[test]
    fn test_parse_suffix_accepts_zero() {
        assert_eq!(parse_suffix("2024-01-01-00"), Some(0));
        assert_eq!(parse_suffix("2024-01-01-07"), Some(7));
        assert_eq!(parse_suffix("2024-01-01-99"), Some(99));
        assert_eq!(parse_suffix("2024-01-01-AB"), None);
        assert_eq!(parse_suffix("2024-01-01-+1"), None);
    }

    #[test]
    fn test_standby_name_display() {
        let name = StandbyName::new(date(2024, 1, 10), StandbyIndex::new(6).unwrap()).unwrap();
        assert_eq!(name.date(), date(2024, 1, 10));
        assert_eq!(name.index().get(), 6);
        assert_eq!(name.to_string(), "2024-01-10-07");
    }

    #[test]
    fn test_search_pattern() {
        let pattern = search_pattern(date(2024, 1, 10));
        assert_eq!(pattern.as_str(), "2024-01-10-??");
        assert!(pattern.matches("2024-01-10-01"));
        assert!(pattern.matches("2024-01-10-AB"));
        assert!(!pattern.matches("2024-01-10-013"));
        assert!(!pattern.matches("2024-01-11-01"));
        assert!(!pattern.matches("2024-01-10-1"));
    }
}
