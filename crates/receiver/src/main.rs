use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webhook_receiver::{
    config::Config,
    server::{self, Server},
    sinks::StdoutSink,
};

/// Receives Alertmanager webhooks, prints each alert and logs it.
#[derive(Parser, Debug)]
#[command(name = "webhook-receiver", version, about)]
struct Cli {
    /// Address to bind, overrides SERVER_ADDR (default 0.0.0.0:5001)
    #[arg(long)]
    addr: Option<String>,

    /// Log filter directive, overrides RUST_LOG (default "info")
    #[arg(long = "log")]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load();
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }
    if let Some(filter) = cli.log_filter {
        config.logging.filter = filter;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter)
                .with_context(|| format!("invalid log filter '{}'", config.logging.filter))?,
        )
        .with_target(false)
        .init();

    config.validate().context("invalid configuration")?;
    let addr = config.socket_addr()?;
    info!("Loaded configuration: {:?}", config);

    println!("{}", server::banner(&config.server.addr));
    println!();

    let server = Server::new(Arc::new(StdoutSink::new()));
    server
        .start(addr)
        .await
        .with_context(|| format!("server on {} failed", addr))?;

    Ok(())
}
