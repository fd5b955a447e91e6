//! # API Gateway
//!
//! The client's only door to the feedback server.
//!
//! ## Architecture
//!
//! - [`ApiGateway`]: the calls the client core depends on (auth, submit,
//!   offline replay). Services and the sync coordinator hold an
//!   `Arc<dyn ApiGateway>`, so tests swap in a scripted gateway.
//! - [`HttpApiClient`]: reqwest implementation of the trait plus the
//!   remaining REST surface (history, templates, moderation, users,
//!   profile, notifications, analytics).
//!
//! ## Errors
//!
//! | Failure | Error |
//! |---|---|
//! | connection refused, DNS, reset | `ClientError::Network` |
//! | request exceeded its timeout | `ClientError::Timeout` |
//! | non-2xx response | `ClientError::Status { status, body }` |
//! | body does not match the DTO | `ClientError::Decode` |

pub mod http;

pub use http::HttpApiClient;

use crate::client::error::ClientResult;
use crate::client::offline::FlatRecord;
use crate::shared::{AuthResponse, FeedbackRequest, FeedbackResponse, LoginRequest, RegisterRequest};
use async_trait::async_trait;

/// Server calls used by the client core
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse>;

    /// Invalidate `token` server-side
    async fn logout(&self, token: &str) -> ClientResult<()>;

    async fn submit_feedback(
        &self,
        token: &str,
        request: &FeedbackRequest,
    ) -> ClientResult<FeedbackResponse>;

    /// Replay a batch of offline records; succeeds only if the server accepted all of them
    async fn sync_offline_feedback(&self, token: &str, records: &[FlatRecord]) -> ClientResult<()>;
}
