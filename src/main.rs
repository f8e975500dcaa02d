//! mailreaper: parallel per-domain web crawler that harvests email addresses.

use clap::Parser;
use mailreaper::{cli::Cli, crawler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = crawler::run_crawl(&cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
    Ok(())
}
