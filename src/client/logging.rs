//! Tracing setup for hosts and the sync daemon

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or `default_filter` when unset
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(default_filter: &str) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Tracing initialized with filter {}", env_filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing("info");
        init_tracing("debug");
        tracing::info!("still logging");
    }
}
