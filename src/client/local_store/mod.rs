//! # Local Key-Value Store
//!
//! Durable string-keyed storage for everything the client keeps on the
//! device: the session, the offline feedback queue and per-category drafts.
//!
//! ## Architecture
//!
//! Components never talk to a concrete backend. They hold an
//! `Arc<dyn KeyValueStore>` handed to them at construction, so one store
//! instance is shared per process without any global state.
//!
//! - `SqliteStore`: SQLite file in the platform data directory (sqlx)
//! - `MemoryStore`: process-local map for tests and ephemeral hosts
//!
//! ## Guarantees
//!
//! - Read-your-writes: every write is awaited before it returns
//! - Single-key operations are atomic
//! - `set_many` / `remove_many` apply a whole batch or nothing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_client::client::local_store::{KeyValueStore, SqliteStore};
//!
//! # async fn example() -> feedback_client::client::ClientResult<()> {
//! let store = SqliteStore::open_default().await?;
//! store.set("user_token", "a.b.c").await?;
//! assert_eq!(store.get("user_token").await?.as_deref(), Some("a.b.c"));
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::client::error::ClientResult;
use async_trait::async_trait;

/// Persisted bearer token
pub const KEY_USER_TOKEN: &str = "user_token";
/// `"true"` while a session is stored
pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";
/// `"true"` when the stored session has the admin role
pub const KEY_IS_ADMIN: &str = "is_admin";
/// JSON array of unsynced feedback records
pub const KEY_OFFLINE_FEEDBACK: &str = "offline_feedback";
/// Prefix of per-category draft keys
pub const KEY_DRAFT_PREFIX: &str = "draft_feedback_";

/// String-keyed persistent storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Remove a key; absent keys are not an error
    async fn remove(&self, key: &str) -> ClientResult<()>;

    /// Remove every key
    async fn clear(&self) -> ClientResult<()>;

    /// Write several keys atomically
    async fn set_many(&self, entries: &[(&str, &str)]) -> ClientResult<()>;

    /// Remove several keys atomically
    async fn remove_many(&self, keys: &[&str]) -> ClientResult<()>;
}
