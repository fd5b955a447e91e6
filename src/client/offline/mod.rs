//! # Offline Feedback
//!
//! Storage for feedback that could not reach the server. The queue itself
//! never talks to the network; [`crate::client::sync`] drains it.

pub mod queue;

pub use queue::{FlatRecord, OfflineFeedbackQueue, OfflineFeedbackRecord, STATUS_UNSYNCED};
