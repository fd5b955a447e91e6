//! # Background Sync Worker
//!
//! Watches the network monitor and replays the offline queue whenever the
//! device comes back online.
//!
//! ## Behavior
//!
//! - Syncs once at start when already online
//! - Syncs whenever the monitor reports Online again, including a flap that
//!   happened while an earlier sync was still running
//! - Logs Online→Offline transitions, nothing else
//! - Exactly one task per worker; `stop` or drop aborts it
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_client::client::sync::SyncWorker;
//! # async fn example(client: feedback_client::client::FeedbackClient) {
//! let mut worker = SyncWorker::start(client.sync());
//! // ...
//! worker.stop();
//! # }
//! ```

use super::network_monitor::NetworkStatus;
use super::{SyncCoordinator, SyncOutcome};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Background synchronization task
#[derive(Debug)]
pub struct SyncWorker {
    task: Option<JoinHandle<()>>,
}

impl SyncWorker {
    /// Spawn the worker on the current tokio runtime
    pub fn start(coordinator: Arc<SyncCoordinator>) -> Self {
        let handle = tokio::spawn(async move {
            Self::run(coordinator).await;
        });
        Self { task: Some(handle) }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop background synchronization
    pub fn stop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
            tracing::info!("Stopped background sync worker");
        }
    }

    async fn run(coordinator: Arc<SyncCoordinator>) {
        let mut changes = coordinator.monitor().subscribe();
        let initial = *changes.borrow_and_update();
        tracing::info!("Starting background sync worker (network {:?})", initial);

        if initial.is_online() {
            log_outcome(coordinator.sync().await);
        }

        // The receiver keeps only the latest value; a flap during a sync arrives as Online.
        while changes.changed().await.is_ok() {
            let status = *changes.borrow_and_update();
            match status {
                NetworkStatus::Online => {
                    tracing::info!("Network restored; syncing offline feedback");
                    log_outcome(coordinator.sync().await);
                }
                NetworkStatus::Offline => {
                    tracing::info!("Network lost; offline feedback will wait");
                }
            }
        }

        tracing::info!("Network monitor closed; background sync worker exiting");
    }
}

fn log_outcome(outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Synced { count } => tracing::info!("Background sync delivered {} records", count),
        SyncOutcome::Failed { reason } => tracing::warn!("Background sync failed: {}", reason),
        SyncOutcome::NoSession => tracing::debug!("Background sync skipped: logged out"),
        SyncOutcome::NothingToSync => tracing::debug!("Background sync: queue empty"),
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}
