//! # Offline Feedback Queue
//!
//! Feedback submitted without connectivity is appended here and replayed by
//! the sync coordinator once the device is back online.
//!
//! ## Features
//!
//! - **Persistent Queue**: records survive app restarts (stored under `offline_feedback`)
//! - **Append Only**: `enqueue` never overwrites earlier records
//! - **Critical Section**: every read-modify-write runs under one async mutex
//!   shared by all clones of the queue
//! - **Tolerant Reads**: malformed entries are skipped, not fatal
//!
//! ## Persisted Form
//!
//! A JSON array of flat objects whose values are all strings:
//!
//! ```json
//! [{"_id":"6f1c...","category":"Teaching","feedback":"Great","status":"unsynced"}]
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_client::client::offline::OfflineFeedbackQueue;
//! use feedback_client::client::local_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> feedback_client::client::ClientResult<()> {
//! let queue = OfflineFeedbackQueue::new(Arc::new(MemoryStore::new()));
//! queue.enqueue("Teaching", "Great course").await?;
//!
//! for record in queue.peek_all().await? {
//!     println!("{} -> {}", record.local_id, record.category);
//! }
//! # Ok(())
//! # }
//! ```

use crate::client::error::ClientResult;
use crate::client::local_store::{KeyValueStore, KEY_OFFLINE_FEEDBACK};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Status of every record while it waits in the queue
pub const STATUS_UNSYNCED: &str = "unsynced";

/// Flat string map sent to the sync endpoint
pub type FlatRecord = BTreeMap<String, String>;

/// Feedback captured while offline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineFeedbackRecord {
    /// Device-local identifier, unique within the queue
    #[serde(rename = "_id")]
    pub local_id: String,
    pub category: String,
    #[serde(rename = "feedback")]
    pub feedback_text: String,
    pub status: String,
}

impl OfflineFeedbackRecord {
    pub fn new(category: impl Into<String>, feedback_text: impl Into<String>) -> Self {
        Self {
            local_id: Uuid::new_v4().to_string(),
            category: category.into(),
            feedback_text: feedback_text.into(),
            status: STATUS_UNSYNCED.to_string(),
        }
    }

    /// Every field as a string, keyed by its wire name
    pub fn to_flat_map(&self) -> FlatRecord {
        let mut map = FlatRecord::new();
        map.insert("_id".to_string(), self.local_id.clone());
        map.insert("category".to_string(), self.category.clone());
        map.insert("feedback".to_string(), self.feedback_text.clone());
        map.insert("status".to_string(), self.status.clone());
        map
    }

    /// Rebuild a record from one persisted entry; `None` if it is unusable
    fn from_value(value: Value) -> Option<Self> {
        let object = match value {
            Value::Object(object) => object,
            _ => return None,
        };
        let flat: FlatRecord = object
            .into_iter()
            .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key, v)))
            .collect();

        Some(Self {
            local_id: flat.get("_id")?.clone(),
            category: flat.get("category")?.clone(),
            feedback_text: flat.get("feedback")?.clone(),
            status: flat
                .get("status")
                .cloned()
                .unwrap_or_else(|| STATUS_UNSYNCED.to_string()),
        })
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Persistent, append-only list of unsynced feedback
#[derive(Clone)]
pub struct OfflineFeedbackQueue {
    store: Arc<dyn KeyValueStore>,
    lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for OfflineFeedbackQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineFeedbackQueue").finish_non_exhaustive()
    }
}

impl OfflineFeedbackQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append a new unsynced record; never touches the network
    pub async fn enqueue(
        &self,
        category: &str,
        feedback_text: &str,
    ) -> ClientResult<OfflineFeedbackRecord> {
        let record = OfflineFeedbackRecord::new(category, feedback_text);

        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.push(record.clone());
        self.write_records(&records).await?;

        tracing::info!(
            "Stored feedback offline: id={}, category={}, queued={}",
            record.local_id,
            record.category,
            records.len()
        );
        Ok(record)
    }

    /// Every queued record in insertion order
    pub async fn peek_all(&self) -> ClientResult<Vec<OfflineFeedbackRecord>> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    pub async fn len(&self) -> ClientResult<usize> {
        Ok(self.peek_all().await?.len())
    }

    pub async fn is_empty(&self) -> ClientResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Remove the records with the given ids; returns how many were removed
    pub async fn remove(&self, local_ids: &[String]) -> ClientResult<usize> {
        let ids: HashSet<&str> = local_ids.iter().map(String::as_str).collect();

        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        let before = records.len();
        let remaining: Vec<OfflineFeedbackRecord> = records
            .into_iter()
            .filter(|record| !ids.contains(record.local_id.as_str()))
            .collect();
        let removed = before - remaining.len();

        if remaining.is_empty() {
            self.store.remove(KEY_OFFLINE_FEEDBACK).await?;
        } else if removed > 0 {
            self.write_records(&remaining).await?;
        }
        Ok(removed)
    }

    /// Drop every queued record
    pub async fn clear(&self) -> ClientResult<()> {
        let _guard = self.lock.lock().await;
        self.store.remove(KEY_OFFLINE_FEEDBACK).await?;
        tracing::info!("Cleared offline feedback queue");
        Ok(())
    }

    async fn read_records(&self) -> ClientResult<Vec<OfflineFeedbackRecord>> {
        let raw = match self.store.get(KEY_OFFLINE_FEEDBACK).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        Ok(decode_queue(&raw))
    }

    async fn write_records(&self, records: &[OfflineFeedbackRecord]) -> ClientResult<()> {
        let flat: Vec<FlatRecord> = records.iter().map(OfflineFeedbackRecord::to_flat_map).collect();
        let encoded = serde_json::to_string(&flat)?;
        self.store.set(KEY_OFFLINE_FEEDBACK, &encoded).await
    }
}

/// Parse a persisted queue, skipping entries that cannot be used
pub fn decode_queue(raw: &str) -> Vec<OfflineFeedbackRecord> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Offline feedback queue is not a JSON array, ignoring it: {}", e);
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<OfflineFeedbackRecord> = entries
        .into_iter()
        .filter_map(OfflineFeedbackRecord::from_value)
        .collect();
    if records.len() < total {
        tracing::warn!(
            "Skipped {} malformed offline feedback entries",
            total - records.len()
        );
    }
    records
}
