//! # Network Monitor
//!
//! Tracks whether the server is reachable and tells subscribers about
//! transitions.
//!
//! ## Features
//!
//! - **Connectivity Detection**: Online/offline status in a `watch` channel
//! - **Host Events**: platforms push their own connectivity events with `set_status`
//! - **Periodic Probe**: optional single background task running a [`ConnectivityProbe`]
//! - **Transitions Only**: subscribers wake on real changes, never on repeats
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedback_client::client::sync::network_monitor::{NetworkMonitor, NetworkStatus};
//!
//! let monitor = NetworkMonitor::new(NetworkStatus::Offline);
//! let mut changes = monitor.subscribe();
//!
//! monitor.set_status(NetworkStatus::Online);
//! assert!(monitor.is_online());
//! assert!(changes.has_changed().unwrap_or(false));
//! ```

use crate::client::config::Config;
use crate::client::error::{ClientError, ClientResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl NetworkStatus {
    pub fn is_online(self) -> bool {
        self == NetworkStatus::Online
    }
}

/// One connectivity check
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn check(&self) -> NetworkStatus;
}

/// Online when the server answers anything at all
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(config: &Config) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.server_url().to_string(),
        })
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn check(&self) -> NetworkStatus {
        match self.client.head(&self.url).send().await {
            Ok(_) => NetworkStatus::Online,
            Err(e) => {
                tracing::debug!("Connectivity probe failed: {}", e);
                NetworkStatus::Offline
            }
        }
    }
}

/// Current connectivity plus the optional probe task
#[derive(Debug)]
pub struct NetworkMonitor {
    sender: Arc<watch::Sender<NetworkStatus>>,
    probe_task: Mutex<Option<JoinHandle<()>>>,
}

impl NetworkMonitor {
    pub fn new(initial: NetworkStatus) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            probe_task: Mutex::new(None),
        }
    }

    pub fn get_status(&self) -> NetworkStatus {
        *self.sender.borrow()
    }

    /// Point-in-time check; may be stale by the time the caller acts on it
    pub fn is_online(&self) -> bool {
        self.get_status().is_online()
    }

    /// Record a status; returns `true` if it was a transition
    pub fn set_status(&self, status: NetworkStatus) -> bool {
        publish(&self.sender, status)
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.sender.subscribe()
    }

    /// Run `probe` every `interval` until [`NetworkMonitor::stop`] or drop
    pub fn start_probe(
        &self,
        probe: Arc<dyn ConnectivityProbe>,
        interval: Duration,
    ) -> ClientResult<()> {
        let mut task = self.probe_task.lock().unwrap_or_else(|e| e.into_inner());
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(ClientError::AlreadyRunning("Connectivity probe"));
        }

        let sender = Arc::clone(&self.sender);
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let status = probe.check().await;
                publish(&sender, status);
            }
        }));

        tracing::info!("Started connectivity probe every {:?}", interval);
        Ok(())
    }

    pub fn is_probing(&self) -> bool {
        self.probe_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the probe task, if any
    pub fn stop(&self) {
        if let Some(handle) = self
            .probe_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
            tracing::info!("Stopped connectivity probe");
        }
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(NetworkStatus::Offline)
    }
}

impl Drop for NetworkMonitor {
    fn drop(&mut self) {
        let task = match self.probe_task.get_mut() {
            Ok(task) => task,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

fn publish(sender: &watch::Sender<NetworkStatus>, status: NetworkStatus) -> bool {
    let changed = sender.send_if_modified(|current| {
        if *current == status {
            false
        } else {
            *current = status;
            true
        }
    });
    if changed {
        match status {
            NetworkStatus::Online => tracing::info!("Network available"),
            NetworkStatus::Offline => tracing::warn!("Network lost"),
        }
    }
    changed
}
