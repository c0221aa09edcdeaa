//! Standby directory naming.
//!
//! Every directory managed by standbydir is named after the calendar date it
//! belongs to and a per-date index:
//!
//! ```text
//! <root>/
//! ├── 2024-01-10-01/
//! ├── 2024-01-10-02/
//! └── 2024-01-11-01/
//! ```
//!
//! ## Canonical form
//! - Date: `YYYY-MM-DD` (always 10 characters, years `0000`..`9999`)
//! - Separator: `-`
//! - Index: 1-based, zero-padded to 2 digits (`01`..`99`)
//! - Total length: 13 ASCII characters
//!
//! The two-digit field caps a single date at 99 directories. Names that do not
//! follow this form exactly (wrong length, non-numeric index) are not standby
//! directories and are never touched. A `00` suffix is never allocated, but a
//! directory carrying it still belongs to its date.
//!
//! This crate provides:
//! - [`format_name`], [`parse_suffix`] and [`try_parse_index`] for encoding and decoding,
//! - [`StandbyName`] for the full (date, index) pair,
//! - [`SearchPattern`] for wildcard listing of the directories of one date.

mod codec;

pub use codec::{
    format_name, parse_suffix, search_pattern, try_parse_index, SearchPattern, StandbyName,
    DATE_FORMAT, DATE_PLACEHOLDER, INDEX_PLACEHOLDER, NAME_LEN, NAME_PLACEHOLDER, WILDCARD,
};
pub use standby_types::{IndexError, StandbyIndex, INDEX_CAPACITY, INDEX_WIDTH};

/// Error type for naming operations.
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// The date cannot be rendered in the fixed four-digit year form
    #[error("Date {0} cannot be rendered as YYYY-MM-DD")]
    DateOutOfRange(chrono::NaiveDate),

    /// The index does not fit the two-digit field
    #[error("Invalid index: {0}")]
    Index(#[from] IndexError),
}

/// Result type for naming operations.
pub type NamingResult<T> = Result<T, NamingError>;
