//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - A scripted `ApiGateway` with call counters
//! - Token fixtures
//! - Client builders on in-memory or on-disk stores

#![allow(dead_code)]

use async_trait::async_trait;
use feedback_client::client::api::ApiGateway;
use feedback_client::client::local_store::{KeyValueStore, MemoryStore};
use feedback_client::client::offline::FlatRecord;
use feedback_client::client::token::unsigned_token_with_exp;
use feedback_client::client::{ClientError, ClientResult, Config, FeedbackClient};
use feedback_client::shared::{
    AppConfig, AuthResponse, FeedbackRequest, FeedbackResponse, LoginRequest, RegisterRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted call answers
#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Network,
    Status(u16),
    /// Succeed after sleeping
    Delay(Duration),
    /// Fail with a network error after sleeping
    SlowNetwork(Duration),
}

impl Reply {
    async fn apply(&self) -> ClientResult<()> {
        match self {
            Reply::Ok => Ok(()),
            Reply::Network => Err(ClientError::Network("connection refused".into())),
            Reply::Status(status) => Err(ClientError::Status {
                status: *status,
                body: "scripted failure".into(),
            }),
            Reply::Delay(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
            Reply::SlowNetwork(duration) => {
                tokio::time::sleep(*duration).await;
                Err(ClientError::Network("connection reset".into()))
            }
        }
    }
}

/// `ApiGateway` that records every call and answers as scripted
pub struct MockGateway {
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub sync_calls: AtomicUsize,
    pub synced_batches: Mutex<Vec<Vec<FlatRecord>>>,
    pub login_reply: Mutex<Reply>,
    pub logout_reply: Mutex<Reply>,
    pub submit_reply: Mutex<Reply>,
    pub sync_reply: Mutex<Reply>,
    pub is_admin: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            sync_calls: AtomicUsize::new(0),
            synced_batches: Mutex::new(Vec::new()),
            login_reply: Mutex::new(Reply::Ok),
            logout_reply: Mutex::new(Reply::Ok),
            submit_reply: Mutex::new(Reply::Ok),
            sync_reply: Mutex::new(Reply::Ok),
            is_admin: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::new()
        }
    }

    pub fn set_sync_reply(&self, reply: Reply) {
        *self.sync_reply.lock().unwrap() = reply;
    }

    pub fn set_submit_reply(&self, reply: Reply) {
        *self.submit_reply.lock().unwrap() = reply;
    }

    pub fn set_logout_reply(&self, reply: Reply) {
        *self.logout_reply.lock().unwrap() = reply;
    }

    pub fn set_login_reply(&self, reply: Reply) {
        *self.login_reply.lock().unwrap() = reply;
    }

    pub fn sync_count(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn logout_count(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    fn reply(slot: &Mutex<Reply>) -> Reply {
        slot.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Self::reply(&self.login_reply).apply().await?;
        Ok(AuthResponse {
            id: "u1".into(),
            name: "Test User".into(),
            email: request.email.clone(),
            is_admin: self.is_admin,
            token: valid_token(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        Ok(AuthResponse {
            id: "u2".into(),
            name: request.name.clone(),
            email: request.email.clone(),
            is_admin: false,
            token: valid_token(),
        })
    }

    async fn logout(&self, _token: &str) -> ClientResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Self::reply(&self.logout_reply).apply().await
    }

    async fn submit_feedback(
        &self,
        _token: &str,
        request: &FeedbackRequest,
    ) -> ClientResult<FeedbackResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Self::reply(&self.submit_reply).apply().await?;
        Ok(FeedbackResponse {
            id: "f1".into(),
            category: request.category.clone(),
            feedback: request.feedback.clone(),
            status: "pending".into(),
        })
    }

    async fn sync_offline_feedback(&self, _token: &str, records: &[FlatRecord]) -> ClientResult<()> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        self.synced_batches.lock().unwrap().push(records.to_vec());
        Self::reply(&self.sync_reply).apply().await
    }
}

/// Token that expires in an hour
pub fn valid_token() -> String {
    unsigned_token_with_exp(chrono::Utc::now().timestamp() + 3600)
}

/// Token that expired an hour ago
pub fn expired_token() -> String {
    unsigned_token_with_exp(chrono::Utc::now().timestamp() - 3600)
}

/// Config pointing at `base`; unused endpoints never get called
pub fn config_for(base: &str) -> Config {
    Config::with_builder(AppConfig::builder().server_url(base).sync_timeout_secs(2)).unwrap()
}

/// Client over a fresh in-memory store and `gateway`
pub fn memory_client(gateway: Arc<MockGateway>) -> (FeedbackClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = FeedbackClient::with_gateway(
        config_for("http://127.0.0.1:9/api"),
        store.clone() as Arc<dyn KeyValueStore>,
        gateway,
    )
    .unwrap();
    (client, store)
}

/// Same as `memory_client`, already logged in
pub async fn logged_in_client(gateway: Arc<MockGateway>) -> (FeedbackClient, Arc<MemoryStore>) {
    let (client, store) = memory_client(gateway);
    client.session().save_session(&valid_token(), false).await.unwrap();
    (client, store)
}
