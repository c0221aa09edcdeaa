//! Periodic execution of the standby operations.
//!
//! [`Scheduler`] runs named jobs on independent intervals on a tokio runtime and
//! lets callers trigger a job out of band. [`StandbyDriver`] fans the two core
//! operations out over every configured root, either once or as two scheduled
//! jobs via [`run_continuously`].

mod driver;
mod scheduler;

pub use driver::{run_continuously, RootSummary, StandbyDriver, ENSURE_JOB, PRUNE_JOB};
pub use scheduler::{JobError, Scheduler};

/// Errors raised by the scheduler lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// A job with this name is already registered
    #[error("job '{0}' is already registered")]
    DuplicateJob(String),

    /// No job with this name is registered
    #[error("unknown job '{0}'")]
    UnknownJob(String),

    /// Jobs cannot be added or started twice once the scheduler runs
    #[error("scheduler is already running")]
    AlreadyRunning,

    /// Jobs can only be triggered on a running scheduler
    #[error("scheduler is not running")]
    NotRunning,

    /// A job interval of zero would spin
    #[error("job '{0}' needs a non-zero interval")]
    ZeroInterval(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
