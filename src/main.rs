//! Rate server: `GET /cotacao` → upstream (200ms) → store (10ms) → bid.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use cotacao::config::{load_or_default, ServerConfig};
use cotacao::lifecycle::trigger_on_ctrl_c;
use cotacao::observability::{init_logging, metrics};
use cotacao::resilience::{PERSISTENCE_TIMEOUT, UPSTREAM_TIMEOUT};
use cotacao::RateServer;

#[derive(Parser)]
#[command(name = "cotacao")]
#[command(about = "Serves the current USD/BRL bid, persisting every fetch", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config: ServerConfig = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability.log_level);
    tracing::info!("cotacao v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_url = %config.upstream.url,
        database_url = %config.storage.database_url,
        upstream_timeout_ms = UPSTREAM_TIMEOUT.as_millis() as u64,
        persistence_timeout_ms = PERSISTENCE_TIMEOUT.as_millis() as u64,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = RateServer::new(&config);
    let shutdown = server.shutdown();
    tokio::spawn(async move {
        trigger_on_ctrl_c(&shutdown).await;
    });

    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
