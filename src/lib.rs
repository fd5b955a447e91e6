//! Feedback Client - Main Library
//!
//! Client-side core for a feedback-collection service. Users authenticate,
//! submit categorized feedback against admin-defined question templates and
//! review their history; admins manage users, templates and moderation.
//!
//! # Overview
//!
//! This library provides:
//! - Session handling with fail-closed bearer token expiry detection
//! - Offline-first feedback submission backed by a persistent local queue
//! - Per-category draft answers that survive restarts
//! - Connectivity monitoring that replays the offline queue once per acknowledged batch
//! - A typed HTTP gateway for the REST API
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, shared errors and base configuration
//!   - Request/response DTOs for the REST API
//!   - `SharedError` for serialization and validation failures
//!   - `AppConfig` builder
//!
//! - **`client`** - Everything that runs on the device
//!   - Local key-value store (SQLite via sqlx)
//!   - Session store, draft cache, offline queue
//!   - Connectivity monitor, sync coordinator, background worker
//!   - HTTP gateway and auth/feedback/admin services
//!
//! # Usage
//!
//! ```rust,no_run
//! use feedback_client::client::{Config, FeedbackClient};
//!
//! # async fn example() -> feedback_client::client::ClientResult<()> {
//! let client = FeedbackClient::open(Config::from_env()?).await?;
//!
//! client.auth().login("student@example.com", "secret").await?;
//! let outcome = client.feedback().submit("Teaching", "Great course").await?;
//! println!("{:?}", outcome);
//!
//! // Replay anything queued while offline
//! let synced = client.sync().sync().await;
//! println!("{:?}", synced);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! All components are `Send + Sync` and meant to be shared behind `Arc`.
//! Multi-step mutations of the offline queue run inside a critical section,
//! and sync attempts are serialized so two triggers never submit the same
//! snapshot twice.
//!
//! # Error Handling
//!
//! - `Result<T, E>` for fallible operations
//! - `client::ClientError` for anything crossing the network or the store
//! - `shared::SharedError` for serialization and validation failures

/// Shared types and data structures
pub mod shared;

/// Device-side client core
pub mod client;
