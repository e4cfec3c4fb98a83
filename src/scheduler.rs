use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::SchedulerConfig;
use crate::orchestrator::{RunSummary, ScrapeOrchestrator};
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Ran(RunSummary),
    /// The last run is too recent; `remaining` is the wait until the next one is due.
    Skipped { remaining: ChronoDuration },
    Busy,
}

/// Shared entry point for scheduled and on-demand runs.
///
/// At most one run is in progress at a time.
#[derive(Clone)]
pub struct ScrapeTrigger {
    orchestrator: Arc<ScrapeOrchestrator>,
    running: Arc<AtomicBool>,
    threshold: ChronoDuration,
}

impl ScrapeTrigger {
    pub fn new(orchestrator: Arc<ScrapeOrchestrator>, threshold: ChronoDuration) -> Self {
        Self {
            orchestrator,
            running: Arc::new(AtomicBool::new(false)),
            threshold,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs the pipeline immediately unless another run holds the slot.
    pub async fn run_now(&self) -> Result<RunSummary> {
        let _slot = self.try_begin().ok_or(AppError::RunInProgress)?;
        self.orchestrator.run().await
    }

    /// One scheduler tick: runs only when the last completed run is older than the threshold.
    pub async fn tick(&self) -> Result<TickOutcome> {
        let last = self.orchestrator.status().get_last_update_time().await?;
        let elapsed = Utc::now().signed_duration_since(last);

        if elapsed < self.threshold {
            let remaining = self.threshold - elapsed;
            tracing::info!(
                remaining_minutes = remaining.num_minutes(),
                "last update is recent, skipping scheduled run"
            );
            return Ok(TickOutcome::Skipped { remaining });
        }

        match self.run_now().await {
            Ok(summary) => Ok(TickOutcome::Ran(summary)),
            Err(AppError::RunInProgress) => {
                tracing::info!("a run is already in progress, skipping tick");
                Ok(TickOutcome::Busy)
            }
            Err(e) => Err(e),
        }
    }

    fn try_begin(&self) -> Option<RunSlot> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunSlot {
                running: Arc::clone(&self.running),
            })
    }
}

struct RunSlot {
    running: Arc<AtomicBool>,
}

impl Drop for RunSlot {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Background loop that ticks the trigger on a fixed interval.
pub struct UpdateScheduler {
    scheduler: JobScheduler,
    trigger: ScrapeTrigger,
    config: SchedulerConfig,
}

impl UpdateScheduler {
    pub async fn new(orchestrator: Arc<ScrapeOrchestrator>, config: SchedulerConfig) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        let trigger = ScrapeTrigger::new(orchestrator, config.update_threshold());

        Ok(Self {
            scheduler,
            trigger,
            config,
        })
    }

    pub fn trigger(&self) -> &ScrapeTrigger {
        &self.trigger
    }

    pub async fn start(&mut self) -> Result<()> {
        let trigger = self.trigger.clone();

        let job = Job::new_repeated_async(self.config.tick_interval(), move |_uuid, _lock| {
            let trigger = trigger.clone();
            Box::pin(async move {
                match trigger.tick().await {
                    Ok(TickOutcome::Ran(summary)) => {
                        tracing::info!(updated = summary.updated, failed = summary.failed, "scheduled run finished");
                    }
                    Ok(_) => {}
                    // A failed run never stops the loop.
                    Err(e) => tracing::error!(error = %e, "scheduled run failed"),
                }
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;
        tracing::info!(
            tick_interval_secs = self.config.tick_interval_secs,
            update_threshold_hours = self.config.update_threshold_hours,
            "update scheduler started"
        );
        Ok(())
    }

    /// Stops ticking. A run already in progress is left to finish.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        tracing::info!("update scheduler shutdown");
        Ok(())
    }
}
