//! Fans the standby operations out over every watched root.

use crate::scheduler::{JobError, Scheduler};
use crate::SchedulerResult;
use serde::Serialize;
use standby_core::{Clock, EnsureOutcome, PruneReport, StandbyConfig, StandbyResult, StandbyRoot};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Name of the scheduled allocation job.
pub const ENSURE_JOB: &str = "ensure-standby";

/// Name of the scheduled prune job.
pub const PRUNE_JOB: &str = "prune-obsolete";

/// Result of a one-shot run for a single root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootSummary {
    pub root: PathBuf,
    pub ensure: EnsureOutcome,
    pub prune: PruneReport,
}

/// Runs the standby operations across a fixed set of roots.
///
/// The clock is read on every call, so a long-running scheduler moves on to a
/// new date at midnight.
pub struct StandbyDriver {
    roots: Vec<StandbyRoot>,
    config: StandbyConfig,
    clock: Arc<dyn Clock>,
}

impl StandbyDriver {
    /// Validates every root up front.
    ///
    /// # Errors
    ///
    /// Returns `StandbyError::InvalidRootDirectory` for the first root that is
    /// missing or not a directory.
    pub fn new<I, P>(roots: I, config: StandbyConfig, clock: Arc<dyn Clock>) -> StandbyResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots = roots
            .into_iter()
            .map(StandbyRoot::new)
            .collect::<StandbyResult<Vec<_>>>()?;

        Ok(Self {
            roots,
            config,
            clock,
        })
    }

    pub fn roots(&self) -> &[StandbyRoot] {
        &self.roots
    }

    pub fn config(&self) -> &StandbyConfig {
        &self.config
    }

    /// Ensures a standby directory for today under every root.
    ///
    /// Stops at the first failing root.
    pub fn ensure_all(&self) -> StandbyResult<Vec<EnsureOutcome>> {
        let today = self.clock.today();
        self.roots
            .iter()
            .map(|root| root.ensure_standby(today, &self.config))
            .collect()
    }

    /// Prunes obsolete directories under every root.
    ///
    /// Stops at the first failing root.
    pub fn prune_all(&self) -> StandbyResult<Vec<PruneReport>> {
        let reference = self.clock.prune_reference_date(self.config.prune_bias());
        self.roots
            .iter()
            .map(|root| root.prune_obsolete(reference, &self.config))
            .collect()
    }

    /// Ensures then prunes each root in turn, using a single reading of the clock.
    pub fn run_once(&self) -> StandbyResult<Vec<RootSummary>> {
        let today = self.clock.today();
        let reference = self.clock.prune_reference_date(self.config.prune_bias());

        let mut summaries = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let ensure = root.ensure_standby(today, &self.config)?;
            let prune = root.prune_obsolete(reference, &self.config)?;
            tracing::info!(
                root = %root.path().display(),
                standby = %ensure.path().display(),
                created = ensure.is_created(),
                deleted = prune.deleted.len(),
                "Processed root"
            );
            summaries.push(RootSummary {
                root: root.path().to_path_buf(),
                ensure,
                prune,
            });
        }

        Ok(summaries)
    }

    /// Builds a scheduler with the allocation and prune jobs registered at
    /// their configured intervals. The scheduler is not started.
    pub fn scheduler(self: &Arc<Self>) -> SchedulerResult<Scheduler> {
        let mut scheduler = Scheduler::new();

        let driver = Arc::clone(self);
        scheduler.add_job(ENSURE_JOB, self.config.ensure_interval(), move || {
            driver
                .ensure_all()
                .map(|_| ())
                .map_err(|e| -> JobError { Box::new(e) })
        })?;

        let driver = Arc::clone(self);
        scheduler.add_job(PRUNE_JOB, self.config.prune_interval(), move || {
            let reports = driver.prune_all().map_err(|e| -> JobError { Box::new(e) })?;
            let deleted: usize = reports.iter().map(|r| r.deleted.len()).sum();
            if deleted > 0 {
                tracing::info!(deleted, "Pruned obsolete standby directories");
            }
            Ok(())
        })?;

        Ok(scheduler)
    }
}

/// Runs both jobs until `stop` completes.
///
/// After `startup_delay` both jobs are triggered once so the roots are brought
/// up to date without waiting a full interval. If `stop` completes during the
/// delay the jobs are triggered right away instead, so every invocation does at
/// least one full pass. Runs still in flight when `stop` completes are allowed
/// to finish.
pub async fn run_continuously<S>(
    driver: Arc<StandbyDriver>,
    startup_delay: Duration,
    stop: S,
) -> SchedulerResult<()>
where
    S: Future<Output = ()>,
{
    let mut scheduler = driver.scheduler()?;
    scheduler.start()?;
    tracing::info!(
        roots = driver.roots().len(),
        ensure_interval = ?driver.config().ensure_interval(),
        prune_interval = ?driver.config().prune_interval(),
        "Scheduler started"
    );

    tokio::pin!(stop);
    let stopped_early = tokio::select! {
        _ = tokio::time::sleep(startup_delay) => false,
        _ = &mut stop => true,
    };

    scheduler.trigger(ENSURE_JOB)?;
    scheduler.trigger(PRUNE_JOB)?;

    if stopped_early {
        tracing::info!("Stop requested during startup, finishing the initial run");
    } else {
        stop.await;
    }

    tracing::info!("Stopping scheduler");
    scheduler.stop().await;
    Ok(())
}
