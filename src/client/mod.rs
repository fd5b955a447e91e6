//! # Client Module
//!
//! Everything that runs on the device. [`FeedbackClient`] wires the pieces
//! together on one shared key-value store.
//!
//! ## Architecture
//!
//! ```text
//! AuthService ─┐
//! FeedbackService ─┼─> SessionStore / DraftCache / OfflineFeedbackQueue ─> KeyValueStore
//! AdminService ─┘                       │
//!          │                            └─ SyncCoordinator <─ SyncWorker <─ NetworkMonitor
//!          └──────────> ApiGateway / HttpApiClient
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_client::client::{Config, FeedbackClient};
//! use feedback_client::client::sync::SyncWorker;
//!
//! # async fn example() -> feedback_client::client::ClientResult<()> {
//! let client = FeedbackClient::open(Config::from_env()?).await?;
//! let _worker = SyncWorker::start(client.sync());
//!
//! if client.auth().is_logged_in().await? {
//!     let history = client.feedback().history().await?;
//!     println!("{} earlier submissions", history.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod feedback;
pub mod local_store;
pub mod logging;
pub mod offline;
pub mod session;
pub mod sync;
pub mod token;

pub use admin::AdminService;
pub use auth::AuthService;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use feedback::{FeedbackService, SubmitOutcome};

use api::{ApiGateway, HttpApiClient};
use draft::DraftCache;
use local_store::{KeyValueStore, SqliteStore};
use offline::OfflineFeedbackQueue;
use session::SessionStore;
use std::sync::Arc;
use sync::{NetworkMonitor, NetworkStatus, SyncCoordinator};

/// Fully wired client core
#[derive(Clone)]
pub struct FeedbackClient {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    session: SessionStore,
    drafts: DraftCache,
    queue: OfflineFeedbackQueue,
    monitor: Arc<NetworkMonitor>,
    http: Arc<HttpApiClient>,
    auth: AuthService,
    feedback: FeedbackService,
    admin: AdminService,
    sync: Arc<SyncCoordinator>,
}

impl std::fmt::Debug for FeedbackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackClient")
            .field("server_url", &self.config.server_url())
            .finish_non_exhaustive()
    }
}

impl FeedbackClient {
    /// Open the SQLite store from `config` and talk to the configured server
    pub async fn open(config: Config) -> ClientResult<Self> {
        let store = SqliteStore::open_in(config.data_dir()).await?;
        Self::with_store(config, Arc::new(store))
    }

    /// Use an existing store; the HTTP client is the gateway
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        let http = Arc::new(HttpApiClient::new(config.clone())?);
        let gateway: Arc<dyn ApiGateway> = http.clone();
        Ok(Self::assemble(config, store, gateway, http))
    }

    /// Use an existing store and a custom gateway for the core calls
    ///
    /// Read-only and admin endpoints still go through the HTTP client built
    /// from `config`.
    pub fn with_gateway(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ApiGateway>,
    ) -> ClientResult<Self> {
        let http = Arc::new(HttpApiClient::new(config.clone())?);
        Ok(Self::assemble(config, store, gateway, http))
    }

    fn assemble(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ApiGateway>,
        http: Arc<HttpApiClient>,
    ) -> Self {
        let session = SessionStore::new(store.clone());
        let drafts = DraftCache::new(store.clone());
        let queue = OfflineFeedbackQueue::new(store.clone());
        // Assume reachable until told otherwise; a failed submit still lands in the queue
        let monitor = Arc::new(NetworkMonitor::new(NetworkStatus::Online));

        let feedback = FeedbackService::new(
            session.clone(),
            queue.clone(),
            drafts.clone(),
            monitor.clone(),
            gateway.clone(),
            http.clone(),
        );
        let admin = AdminService::new(session.clone(), http.clone());
        let sync = Arc::new(SyncCoordinator::new(
            session.clone(),
            queue.clone(),
            gateway.clone(),
            monitor.clone(),
            config.sync_timeout(),
        ));
        let auth = AuthService::new(session.clone(), gateway, http.clone(), sync.clone());

        tracing::info!("Feedback client ready for {}", config.server_url());
        Self {
            config,
            store,
            session,
            drafts,
            queue,
            monitor,
            http,
            auth,
            feedback,
            admin,
            sync,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn feedback(&self) -> &FeedbackService {
        &self.feedback
    }

    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    /// Shared sync coordinator; hand it to a [`sync::SyncWorker`]
    pub fn sync(&self) -> Arc<SyncCoordinator> {
        Arc::clone(&self.sync)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn drafts(&self) -> &DraftCache {
        &self.drafts
    }

    pub fn queue(&self) -> &OfflineFeedbackQueue {
        &self.queue
    }

    pub fn monitor(&self) -> &Arc<NetworkMonitor> {
        &self.monitor
    }

    pub fn http(&self) -> &Arc<HttpApiClient> {
        &self.http
    }
}
