/**
 * Feedback Sync Daemon
 *
 * Keeps the offline feedback queue flowing for hosts that have no UI loop:
 * probes the server, and replays queued feedback whenever it comes back.
 */

use feedback_client::client::logging::init_tracing;
use feedback_client::client::sync::{HttpProbe, SyncWorker};
use feedback_client::client::{Config, FeedbackClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();
    init_tracing("info");

    let config = Config::from_env()?;
    tracing::info!("Starting feedback sync against {}", config.server_url());

    let client = FeedbackClient::open(config.clone()).await?;
    let pending = client.queue().len().await?;
    tracing::info!("{} offline feedback records pending", pending);

    let probe = Arc::new(HttpProbe::new(&config)?);
    client.monitor().start_probe(probe, config.probe_interval())?;
    let mut worker = SyncWorker::start(client.sync());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    worker.stop();
    client.monitor().stop();
    Ok(())
}
