//! # Offline Feedback Sync
//!
//! Replays the offline feedback queue to the server once connectivity
//! returns.
//!
//! ## Architecture
//!
//! - **Sync Coordinator**: one batch replay per call, single-flight
//! - **Network Monitor**: connectivity status and optional probe
//! - **Background Worker**: runs the coordinator on every Offline→Online transition
//! - **Sync State**: snapshot for status displays
//!
//! ## Protocol
//!
//! 1. No valid session token: abort, nothing changes
//! 2. Empty queue: no network call
//! 3. Otherwise the whole queue goes out as one batch, bounded by the sync timeout
//! 4. Success removes exactly the records that were sent; records queued
//!    while the request was in flight stay for the next run
//! 5. Any failure leaves the queue untouched
//!
//! A second caller that arrives while a run is in flight waits for it and
//! then sees the drained queue, so nothing is submitted twice.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_client::client::sync::SyncOutcome;
//! # async fn example(client: feedback_client::client::FeedbackClient) {
//! match client.sync().sync().await {
//!     SyncOutcome::Synced { count } => println!("delivered {}", count),
//!     SyncOutcome::Failed { reason } => eprintln!("will retry: {}", reason),
//!     _ => {}
//! }
//! # }
//! ```

pub mod background;
pub mod network_monitor;
pub mod sync_state;

pub use background::SyncWorker;
pub use network_monitor::{ConnectivityProbe, HttpProbe, NetworkMonitor, NetworkStatus};
pub use sync_state::SyncState;

use crate::client::api::ApiGateway;
use crate::client::error::ClientError;
use crate::client::offline::{FlatRecord, OfflineFeedbackQueue};
use crate::client::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Result of one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No valid session; retried on the next trigger
    NoSession,
    /// Queue was empty; no request made
    NothingToSync,
    /// Server accepted the batch and it was removed locally
    Synced { count: usize },
    /// Request failed or timed out; queue untouched
    Failed { reason: String },
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// Main sync coordinator
pub struct SyncCoordinator {
    session: SessionStore,
    queue: OfflineFeedbackQueue,
    gateway: Arc<dyn ApiGateway>,
    monitor: Arc<NetworkMonitor>,
    sync_timeout: Duration,
    state: RwLock<SyncState>,
    in_flight: Mutex<()>,
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("sync_timeout", &self.sync_timeout)
            .finish_non_exhaustive()
    }
}

impl SyncCoordinator {
    /// Create a new sync coordinator
    pub fn new(
        session: SessionStore,
        queue: OfflineFeedbackQueue,
        gateway: Arc<dyn ApiGateway>,
        monitor: Arc<NetworkMonitor>,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            session,
            queue,
            gateway,
            monitor,
            sync_timeout,
            state: RwLock::new(SyncState::default()),
            in_flight: Mutex::new(()),
        }
    }

    pub fn monitor(&self) -> &Arc<NetworkMonitor> {
        &self.monitor
    }

    /// Replay the offline queue once
    pub async fn sync(&self) -> SyncOutcome {
        let _flight = self.in_flight.lock().await;
        self.state.write().await.is_syncing = true;

        let outcome = self.perform_sync().await;
        self.finish(&outcome).await;
        outcome
    }

    /// Get current sync status
    pub async fn get_status(&self) -> SyncState {
        let mut state = self.state.read().await.clone();
        state.network_status = self.monitor.get_status();
        state
    }

    async fn perform_sync(&self) -> SyncOutcome {
        let token = match self.session.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::warn!("Skipping offline sync: no valid session");
                return SyncOutcome::NoSession;
            }
            Err(e) => return failed(e),
        };

        let records = match self.queue.peek_all().await {
            Ok(records) => records,
            Err(e) => return failed(e),
        };
        if records.is_empty() {
            tracing::debug!("No offline feedback to sync");
            return SyncOutcome::NothingToSync;
        }

        let batch: Vec<FlatRecord> = records.iter().map(|r| r.to_flat_map()).collect();
        let ids: Vec<String> = records.into_iter().map(|r| r.local_id).collect();
        tracing::info!("Syncing {} offline feedback records", batch.len());

        let sent = tokio::time::timeout(
            self.sync_timeout,
            self.gateway.sync_offline_feedback(&token, &batch),
        )
        .await;

        match sent {
            Ok(Ok(())) => match self.queue.remove(&ids).await {
                Ok(count) => {
                    tracing::info!("Offline feedback synced: {} records", count);
                    SyncOutcome::Synced { count }
                }
                Err(e) => failed(e),
            },
            Ok(Err(e)) => failed(e),
            Err(_) => failed(ClientError::Timeout(self.sync_timeout)),
        }
    }

    async fn finish(&self, outcome: &SyncOutcome) {
        let pending = match self.queue.len().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!("Failed to count offline feedback: {}", e);
                0
            }
        };
        let now = chrono::Utc::now();

        let mut state = self.state.write().await;
        state.is_syncing = false;
        state.last_attempt = Some(now);
        state.pending_records = pending;
        state.network_status = self.monitor.get_status();
        match outcome {
            SyncOutcome::Synced { .. } => {
                state.last_sync = Some(now);
                state.last_error = None;
            }
            SyncOutcome::Failed { reason } => state.last_error = Some(reason.clone()),
            SyncOutcome::NoSession | SyncOutcome::NothingToSync => {}
        }
    }
}

fn failed(error: ClientError) -> SyncOutcome {
    tracing::error!("Offline sync failed: {}", error);
    SyncOutcome::Failed {
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ClientResult;
    use crate::client::local_store::MemoryStore;
    use crate::client::token::unsigned_token_with_exp;
    use crate::shared::{AuthResponse, FeedbackRequest, FeedbackResponse, LoginRequest, RegisterRequest};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub(super) struct CountingGateway {
        pub(super) sync_calls: AtomicUsize,
        pub(super) fail: bool,
    }

    #[async_trait]
    impl ApiGateway for CountingGateway {
        async fn login(&self, _: &LoginRequest) -> ClientResult<AuthResponse> {
            Err(ClientError::Network("unused".into()))
        }

        async fn register(&self, _: &RegisterRequest) -> ClientResult<AuthResponse> {
            Err(ClientError::Network("unused".into()))
        }

        async fn logout(&self, _: &str) -> ClientResult<()> {
            Ok(())
        }

        async fn submit_feedback(&self, _: &str, _: &FeedbackRequest) -> ClientResult<FeedbackResponse> {
            Err(ClientError::Network("unused".into()))
        }

        async fn sync_offline_feedback(&self, _: &str, _: &[FlatRecord]) -> ClientResult<()> {
            self.sync_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ClientError::Status { status: 500, body: "boom".into() })
            } else {
                Ok(())
            }
        }
    }

    pub(super) async fn coordinator(gateway: Arc<CountingGateway>, logged_in: bool) -> SyncCoordinator {
        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::new(store.clone());
        if logged_in {
            let token = unsigned_token_with_exp(chrono::Utc::now().timestamp() + 3600);
            session.save_session(&token, false).await.unwrap();
        }
        SyncCoordinator::new(
            session,
            OfflineFeedbackQueue::new(store),
            gateway,
            Arc::new(NetworkMonitor::new(NetworkStatus::Online)),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_sync_status_initial() {
        let sync = coordinator(Arc::new(CountingGateway::default()), true).await;
        let status = sync.get_status().await;
        assert!(!status.is_syncing);
        assert!(status.last_sync.is_none());
        assert_eq!(status.network_status, NetworkStatus::Online);
    }

    #[tokio::test]
    async fn test_empty_queue_makes_no_call() {
        let gateway = Arc::new(CountingGateway::default());
        let sync = coordinator(gateway.clone(), true).await;
        assert_eq!(sync.sync().await, SyncOutcome::NothingToSync);
        assert_eq!(gateway.sync_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_session_leaves_queue() {
        let gateway = Arc::new(CountingGateway::default());
        let sync = coordinator(gateway.clone(), false).await;
        sync.queue.enqueue("Teaching", "Great").await.unwrap();

        assert_eq!(sync.sync().await, SyncOutcome::NoSession);
        assert_eq!(gateway.sync_calls.load(Ordering::SeqCst), 0);
        assert_eq!(sync.queue.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_success_drains_queue() {
        let gateway = Arc::new(CountingGateway::default());
        let sync = coordinator(gateway.clone(), true).await;
        sync.queue.enqueue("Teaching", "one").await.unwrap();
        sync.queue.enqueue("Library", "two").await.unwrap();

        assert_eq!(sync.sync().await, SyncOutcome::Synced { count: 2 });
        assert!(sync.queue.is_empty().await.unwrap());

        let status = sync.get_status().await;
        assert!(status.last_sync.is_some());
        assert_eq!(status.pending_records, 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_queue() {
        let gateway = Arc::new(CountingGateway {
            fail: true,
            ..Default::default()
        });
        let sync = coordinator(gateway.clone(), true).await;
        sync.queue.enqueue("Teaching", "one").await.unwrap();

        assert!(sync.sync().await.is_failure());
        assert_eq!(sync.queue.len().await.unwrap(), 1);

        let status = sync.get_status().await;
        assert!(status.last_error.is_some());
        assert!(status.last_sync.is_none());
        assert_eq!(status.pending_records, 1);
    }
}
