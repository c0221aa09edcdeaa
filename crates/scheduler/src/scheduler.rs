//! Interval job runner with manual triggers and graceful shutdown.

use crate::{SchedulerError, SchedulerResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Error returned by a job body.
pub type JobError = Box<dyn std::error::Error + Send + Sync>;

type JobFn = Arc<dyn Fn() -> Result<(), JobError> + Send + Sync>;

struct Job {
    name: String,
    interval: Duration,
    run: JobFn,
    trigger: Arc<Notify>,
}

/// Runs named blocking jobs on independent intervals.
///
/// Each job first fires one full interval after [`Scheduler::start`]; use
/// [`Scheduler::trigger`] for an immediate run. A job never overlaps with
/// itself, but different jobs may run concurrently. A failing run is logged and
/// the job stays scheduled.
pub struct Scheduler {
    jobs: Vec<Job>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
    running: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            handles: Vec::new(),
            running: false,
        }
    }

    /// Registers a job. Jobs must be added before the scheduler starts.
    pub fn add_job<F>(
        &mut self,
        name: impl Into<String>,
        interval: Duration,
        run: F,
    ) -> SchedulerResult<()>
    where
        F: Fn() -> Result<(), JobError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.running {
            return Err(SchedulerError::AlreadyRunning);
        }
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval(name));
        }
        if self.jobs.iter().any(|job| job.name == name) {
            return Err(SchedulerError::DuplicateJob(name));
        }

        self.jobs.push(Job {
            name,
            interval,
            run: Arc::new(run),
            trigger: Arc::new(Notify::new()),
        });
        Ok(())
    }

    /// Spawns one task per job. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> SchedulerResult<()> {
        if self.running {
            return Err(SchedulerError::AlreadyRunning);
        }

        for job in &self.jobs {
            let shutdown = self.shutdown_tx.subscribe();
            self.handles.push(tokio::spawn(job_loop(
                job.name.clone(),
                job.interval,
                Arc::clone(&job.run),
                Arc::clone(&job.trigger),
                shutdown,
            )));
            tracing::debug!(job = %job.name, interval = ?job.interval, "Scheduled job");
        }

        self.running = true;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Requests an immediate run of `name`.
    ///
    /// If the job is currently running, the extra run happens right after it.
    pub fn trigger(&self, name: &str) -> SchedulerResult<()> {
        if !self.running {
            return Err(SchedulerError::NotRunning);
        }

        let job = self
            .jobs
            .iter()
            .find(|job| job.name == name)
            .ok_or_else(|| SchedulerError::UnknownJob(name.to_string()))?;
        job.trigger.notify_one();
        Ok(())
    }

    /// Stops scheduling new runs and waits for runs in flight to finish.
    ///
    /// Runs requested through [`Scheduler::trigger`] before the call still happen.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn job_loop(
    name: String,
    interval: Duration,
    run: JobFn,
    trigger: Arc<Notify>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // A pending trigger is served before shutdown is observed.
        tokio::select! {
            biased;
            _ = trigger.notified() => {
                tracing::debug!(job = %name, "Job triggered manually");
            }
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        execute(&name, &run).await;
    }

    tracing::debug!(job = %name, "Job stopped");
}

async fn execute(name: &str, run: &JobFn) {
    let job = Arc::clone(run);
    let started = Instant::now();

    match tokio::task::spawn_blocking(move || job()).await {
        Ok(Ok(())) => {
            tracing::debug!(job = %name, elapsed = ?started.elapsed(), "Job finished");
        }
        Ok(Err(e)) => {
            tracing::error!(job = %name, error = %e, "Job failed");
        }
        Err(e) => {
            tracing::error!(job = %name, error = %e, "Job panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: &Arc<AtomicUsize>) -> impl Fn() -> Result<(), JobError> {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn wait_for(counter: &AtomicUsize, at_least: usize) -> bool {
        for _ in 0..200 {
            if counter.load(Ordering::SeqCst) >= at_least {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[test]
    fn test_add_job_rejects_duplicates() {
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("a", Duration::from_secs(1), || Ok(()))
            .unwrap();
        let err = scheduler
            .add_job("a", Duration::from_secs(1), || Ok(()))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateJob(name) if name == "a"));
    }

    #[test]
    fn test_add_job_rejects_zero_interval() {
        let mut scheduler = Scheduler::new();
        let err = scheduler.add_job("a", Duration::ZERO, || Ok(())).unwrap_err();
        assert!(matches!(err, SchedulerError::ZeroInterval(_)));
    }

    #[test]
    fn test_trigger_requires_running_scheduler() {
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("a", Duration::from_secs(1), || Ok(()))
            .unwrap();
        assert!(matches!(
            scheduler.trigger("a"),
            Err(SchedulerError::NotRunning)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_trigger_unknown_job() {
        let mut scheduler = Scheduler::new();
        scheduler.start().unwrap();
        assert!(matches!(
            scheduler.trigger("missing"),
            Err(SchedulerError::UnknownJob(_))
        ));
        scheduler.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_add_job_after_start_fails() {
        let mut scheduler = Scheduler::new();
        scheduler.start().unwrap();
        assert!(matches!(
            scheduler.add_job("late", Duration::from_secs(1), || Ok(())),
            Err(SchedulerError::AlreadyRunning)
        ));
        assert!(matches!(scheduler.start(), Err(SchedulerError::AlreadyRunning)));
        scheduler.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_interval_job_runs_repeatedly() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("tick", Duration::from_millis(20), counting_job(&counter))
            .unwrap();
        scheduler.start().unwrap();

        assert!(wait_for(&counter, 3).await);
        scheduler.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_first_tick_waits_one_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("slow", Duration::from_secs(3600), counting_job(&counter))
            .unwrap();
        scheduler.start().unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        scheduler.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_trigger_runs_job_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("slow", Duration::from_secs(3600), counting_job(&counter))
            .unwrap();
        scheduler.start().unwrap();

        scheduler.trigger("slow").unwrap();
        assert!(wait_for(&counter, 1).await);
        scheduler.stop().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_right_after_trigger_still_runs_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("slow", Duration::from_secs(3600), counting_job(&counter))
            .unwrap();
        scheduler.start().unwrap();

        scheduler.trigger("slow").unwrap();
        scheduler.stop().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_prevents_further_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("tick", Duration::from_millis(10), counting_job(&counter))
            .unwrap();
        scheduler.start().unwrap();
        assert!(wait_for(&counter, 1).await);

        scheduler.stop().await;
        let after_stop = counter.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failing_job_stays_scheduled() {
        let counter = Arc::new(AtomicUsize::new(0));
        let job_counter = Arc::clone(&counter);
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("flaky", Duration::from_millis(10), move || {
                job_counter.fetch_add(1, Ordering::SeqCst);
                Err("root went away".into())
            })
            .unwrap();
        scheduler.start().unwrap();

        assert!(wait_for(&counter, 3).await);
        scheduler.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_waits_for_run_in_flight() {
        let finished = Arc::new(AtomicUsize::new(0));
        let job_finished = Arc::clone(&finished);
        let mut scheduler = Scheduler::new();
        scheduler
            .add_job("long", Duration::from_secs(3600), move || {
                std::thread::sleep(Duration::from_millis(150));
                job_finished.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        scheduler.start().unwrap();
        scheduler.trigger("long").unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        scheduler.stop().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
