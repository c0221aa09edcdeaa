//! # standby-core
//!
//! Keeps an empty, date-indexed "standby" directory available under each watched
//! root so an external producer always has somewhere to drop new files.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── 2024-01-09-01/   # used, kept forever
//! ├── 2024-01-10-01/   # used
//! ├── 2024-01-10-02/   # current standby (empty)
//! └── incoming.log     # not a standby name, ignored
//! ```
//!
//! The filesystem is the only state: the date and index of every directory are
//! read back from its name (see `standby_naming`).
//!
//! ## Operations
//!
//! - [`ensure_standby`]: creates `<today>-01`, or the next index once the newest
//!   directory of today has content. Creates at most one directory per call.
//! - [`prune_obsolete`]: removes the empty directories of the 21 dates before the
//!   reference date. Never deletes a directory with content.
//!
//! Both operations are synchronous, hold no state between calls and can be
//! repeated freely. Errors are returned to the caller; a later call is the retry.
//!
//! ## Example
//!
//! ```no_run
//! use standby_core::{Clock, StandbyConfig, StandbyRoot, SystemClock};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StandbyConfig::default();
//! let root = StandbyRoot::new("/srv/dropbox")?;
//! let clock = SystemClock;
//!
//! root.ensure_standby(clock.today(), &config)?;
//! root.prune_obsolete(clock.prune_reference_date(config.prune_bias()), &config)?;
//! # Ok(())
//! # }
//! ```

mod allocator;
mod clock;
pub mod config;
pub mod constants;
mod enumerator;
mod error;
mod pruner;
mod root;

pub use allocator::{ensure_standby, EnsureOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StandbyConfig;
pub use enumerator::{is_empty_dir, list_for_date};
pub use error::{StandbyError, StandbyResult};
pub use pruner::{prune_obsolete, prune_window, PruneReport};
pub use root::StandbyRoot;
