use clap::Parser;
use std::path::PathBuf;

use cotacao::config::{load_or_default, ClientConfig};
use cotacao::observability::init_logging;
use cotacao::rates::shared_client;
use cotacao::{Artifact, RateClient};

#[derive(Parser)]
#[command(name = "cotacao-client")]
#[command(about = "Fetch the current USD/BRL bid from the rate server into a file", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the server's quote URL.
    #[arg(short, long)]
    url: Option<String>,

    /// Override the output file.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config: ClientConfig = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.server_url = url;
    }
    if let Some(output) = cli.output {
        config.artifact_path = output.display().to_string();
    }

    init_logging(&config.observability.log_level);

    let client = RateClient::new(shared_client().clone(), config.server_url);
    let artifact = Artifact::new(config.artifact_path);

    // Failures are already logged by the run; the process still exits cleanly.
    let _ = client.run(&artifact).await;

    Ok(())
}
