//! # Sync State
//!
//! Snapshot of the sync coordinator for status displays.

use super::network_monitor::NetworkStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    /// A sync run is in progress
    pub is_syncing: bool,
    /// Last run that delivered a batch
    pub last_sync: Option<DateTime<Utc>>,
    /// Last run of any outcome
    pub last_attempt: Option<DateTime<Utc>>,
    /// Records still waiting in the offline queue after the last run
    pub pending_records: usize,
    /// Reason of the last failed run; cleared on success
    pub last_error: Option<String>,
    pub network_status: NetworkStatus,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            is_syncing: false,
            last_sync: None,
            last_attempt: None,
            pending_records: 0,
            last_error: None,
            network_status: NetworkStatus::Offline,
        }
    }
}
