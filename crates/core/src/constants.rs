//! Constants used throughout the standby core crate.
//!
//! Defaults for every tunable live here together with the environment variable
//! names the binaries use to override them.

/// Default number of directories a single date may own.
pub const DEFAULT_MAX_DIRECTORIES_PER_DATE: u8 = standby_types::INDEX_CAPACITY;

/// Default number of past dates inspected by the pruner.
pub const DEFAULT_PRUNE_WINDOW_DAYS: u32 = 21;

/// Default backward bias applied to "now" before deriving the prune reference date.
pub const DEFAULT_PRUNE_BIAS_HOURS: i64 = 6;

/// Default interval between standby allocation runs.
pub const DEFAULT_ENSURE_INTERVAL_SECS: u64 = 60;

/// Default interval between prune runs.
pub const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 2 * 60 * 60;

/// Environment variable overriding the per-date directory cap.
pub const ENV_MAX_PER_DATE: &str = "STANDBY_MAX_PER_DATE";

/// Environment variable overriding the prune window length in days.
pub const ENV_PRUNE_WINDOW_DAYS: &str = "STANDBY_PRUNE_WINDOW_DAYS";

/// Environment variable overriding the prune bias in hours.
pub const ENV_PRUNE_BIAS_HOURS: &str = "STANDBY_PRUNE_BIAS_HOURS";

/// Environment variable overriding the allocation interval in seconds.
pub const ENV_ENSURE_INTERVAL_SECS: &str = "STANDBY_ENSURE_INTERVAL_SECS";

/// Environment variable overriding the prune interval in seconds.
pub const ENV_PRUNE_INTERVAL_SECS: &str = "STANDBY_PRUNE_INTERVAL_SECS";

/// Default pause between scheduler start and the first out-of-band run.
pub const DEFAULT_STARTUP_DELAY_MS: u64 = 2_000;

/// Environment variable overriding the startup delay in milliseconds.
pub const ENV_STARTUP_DELAY_MS: &str = "STANDBY_STARTUP_DELAY_MS";

/// Environment variable listing the roots watched by the service binary.
pub const ENV_ROOT_DIRS: &str = "STANDBY_ROOT_DIRS";
