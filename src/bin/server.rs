//! HTTP server binary for the episodego search service.
//!
//! Loads the TOML configuration (path from `EPISODEGO_CONFIG` or the
//! default location) and serves the search API until interrupted.
//! Tracing output goes to stderr, filtered by `RUST_LOG`.

use episodego::config::AppConfig;
use episodego::server::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = AppConfig::resolve_path();
    let config = AppConfig::load_or_default(&path)
        .map_err(|e| anyhow::anyhow!("failed to load config from {}: {e}", path.display()))?;

    tracing::info!(addr = %config.bind_addr(), "episodego-server starting");

    run_server(config).await.map_err(|e| {
        tracing::error!(error = %e, "episodego-server exited with error");
        anyhow::anyhow!("episodego-server failed: {e}")
    })?;

    tracing::info!("episodego-server shut down cleanly");
    Ok(())
}
