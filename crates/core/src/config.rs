//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! allocator, the pruner and the scheduler. Environment variables are only read
//! by the binaries; this module works on already-fetched values so it can be
//! tested without touching the process environment.

use crate::constants::{
    DEFAULT_ENSURE_INTERVAL_SECS, DEFAULT_MAX_DIRECTORIES_PER_DATE, DEFAULT_PRUNE_BIAS_HOURS,
    DEFAULT_PRUNE_INTERVAL_SECS, DEFAULT_PRUNE_WINDOW_DAYS, ENV_ENSURE_INTERVAL_SECS,
    ENV_MAX_PER_DATE, ENV_PRUNE_BIAS_HOURS, ENV_PRUNE_INTERVAL_SECS, ENV_PRUNE_WINDOW_DAYS,
};
use crate::{StandbyError, StandbyResult};
use standby_types::INDEX_CAPACITY;
use std::str::FromStr;
use std::time::Duration;

/// Largest accepted prune bias, in hours.
const MAX_PRUNE_BIAS_HOURS: i64 = 24;

/// Largest accepted prune window; every day in it costs a scan of the root.
const MAX_PRUNE_WINDOW_DAYS: u32 = 366;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandbyConfig {
    max_directories_per_date: u8,
    prune_window_days: u32,
    prune_bias: chrono::Duration,
    ensure_interval: Duration,
    prune_interval: Duration,
}

impl Default for StandbyConfig {
    fn default() -> Self {
        Self {
            max_directories_per_date: DEFAULT_MAX_DIRECTORIES_PER_DATE,
            prune_window_days: DEFAULT_PRUNE_WINDOW_DAYS,
            prune_bias: chrono::Duration::hours(DEFAULT_PRUNE_BIAS_HOURS),
            ensure_interval: Duration::from_secs(DEFAULT_ENSURE_INTERVAL_SECS),
            prune_interval: Duration::from_secs(DEFAULT_PRUNE_INTERVAL_SECS),
        }
    }
}

impl StandbyConfig {
    /// Create a new `StandbyConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`StandbyError::InvalidConfig`] if:
    /// - `max_directories_per_date` is zero or above what two digits can index (99)
    /// - `prune_window_days` is zero or above 366
    /// - `prune_bias_hours` is negative or above 24
    /// - either interval is zero
    pub fn new(
        max_directories_per_date: u8,
        prune_window_days: u32,
        prune_bias_hours: i64,
        ensure_interval: Duration,
        prune_interval: Duration,
    ) -> StandbyResult<Self> {
        if max_directories_per_date == 0 || max_directories_per_date > INDEX_CAPACITY {
            return Err(StandbyError::InvalidConfig(format!(
                "max directories per date must be between 1 and {}, got {}",
                INDEX_CAPACITY, max_directories_per_date
            )));
        }

        if !(1..=MAX_PRUNE_WINDOW_DAYS).contains(&prune_window_days) {
            return Err(StandbyError::InvalidConfig(format!(
                "prune window must be between 1 and {} days, got {}",
                MAX_PRUNE_WINDOW_DAYS, prune_window_days
            )));
        }

        if !(0..=MAX_PRUNE_BIAS_HOURS).contains(&prune_bias_hours) {
            return Err(StandbyError::InvalidConfig(format!(
                "prune bias must be between 0 and {} hours, got {}",
                MAX_PRUNE_BIAS_HOURS, prune_bias_hours
            )));
        }

        if ensure_interval.is_zero() || prune_interval.is_zero() {
            return Err(StandbyError::InvalidConfig(
                "scheduler intervals must be non-zero".into(),
            ));
        }

        Ok(Self {
            max_directories_per_date,
            prune_window_days,
            prune_bias: chrono::Duration::hours(prune_bias_hours),
            ensure_interval,
            prune_interval,
        })
    }

    /// Build a configuration from environment-style values.
    ///
    /// `lookup` is called with each variable name from [`crate::constants`]; a
    /// missing or blank value keeps the default.
    pub fn from_env_values<F>(lookup: F) -> StandbyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max = parse_env_value::<u8>(ENV_MAX_PER_DATE, lookup(ENV_MAX_PER_DATE))?
            .unwrap_or(defaults.max_directories_per_date);
        let window = parse_env_value::<u32>(ENV_PRUNE_WINDOW_DAYS, lookup(ENV_PRUNE_WINDOW_DAYS))?
            .unwrap_or(defaults.prune_window_days);
        let bias = parse_env_value::<i64>(ENV_PRUNE_BIAS_HOURS, lookup(ENV_PRUNE_BIAS_HOURS))?
            .unwrap_or(DEFAULT_PRUNE_BIAS_HOURS);
        let ensure =
            parse_env_value::<u64>(ENV_ENSURE_INTERVAL_SECS, lookup(ENV_ENSURE_INTERVAL_SECS))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.ensure_interval);
        let prune =
            parse_env_value::<u64>(ENV_PRUNE_INTERVAL_SECS, lookup(ENV_PRUNE_INTERVAL_SECS))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.prune_interval);

        Self::new(max, window, bias, ensure, prune)
    }

    pub fn max_directories_per_date(&self) -> u8 {
        self.max_directories_per_date
    }

    pub fn prune_window_days(&self) -> u32 {
        self.prune_window_days
    }

    pub fn prune_bias(&self) -> chrono::Duration {
        self.prune_bias
    }

    pub fn ensure_interval(&self) -> Duration {
        self.ensure_interval
    }

    pub fn prune_interval(&self) -> Duration {
        self.prune_interval
    }
}

/// Parse an optional environment value.
///
/// `None` and empty/whitespace values yield `Ok(None)`.
pub fn parse_env_value<T>(name: &str, value: Option<String>) -> StandbyResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            v.parse::<T>().map_err(|e| {
                StandbyError::InvalidConfig(format!("{} has invalid value '{}': {}", name, v, e))
            })
        })
        .transpose()
}
