//! Periodic per-user synchronization, stoppable through a
//! [`CancellationToken`].

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One batch job run on every tick, e.g. pulling measurements for every
/// linked user and pushing them to the resource API.
#[async_trait]
pub trait SyncJob: Send + Sync {
    type User: Send + Sync;
    type Error: Display + Send;

    /// Label used in logs.
    fn name(&self) -> &str;

    async fn users(&self) -> Result<Vec<Self::User>, Self::Error>;

    async fn sync_user(&self, user: &Self::User) -> Result<(), Self::Error>;
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

pub struct SyncWorker<J> {
    job: J,
    period: Duration,
}

impl<J> SyncWorker<J>
where
    J: SyncJob,
{
    pub fn new(job: J, period: Duration) -> Self {
        SyncWorker { job, period }
    }

    pub fn job(&self) -> &J {
        &self.job
    }

    /// Runs the job once over every user. A failing user is logged and
    /// skipped; the rest of the batch still runs.
    pub async fn tick(&self) -> SyncReport {
        let mut report = SyncReport::default();
        let users = match self.job.users().await {
            Ok(users) => users,
            Err(err) => {
                warn!(job = self.job.name(), error = %err, "failed to list users");
                return report;
            }
        };
        for user in &users {
            match self.job.sync_user(user).await {
                Ok(()) => report.synced += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(job = self.job.name(), error = %err, "user sync failed");
                }
            }
        }
        debug!(
            job = self.job.name(),
            synced = report.synced,
            failed = report.failed,
            "sync tick done"
        );
        report
    }

    /// Ticks every `period` until `cancel` fires. The first tick runs
    /// immediately; a tick in progress is finished before stopping.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(job = self.job.name(), period = ?self.period, "sync worker started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
        info!(job = self.job.name(), "sync worker stopped");
    }
}
