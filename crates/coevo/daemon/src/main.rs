//! coevod - co-evolution playground daemon
//!
//! Hosts one in-memory evolution controller behind a REST/SSE surface:
//! - run lifecycle control (start/stop/reset)
//! - log and report snapshots
//! - live per-generation event streaming

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod server;

use crate::config::DaemonConfig;
use crate::server::Server;

/// coevod CLI
#[derive(Parser)]
#[command(name = "coevod")]
#[command(about = "Co-evolution playground daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "COEVO_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(
        short,
        long,
        env = "COEVO_LISTEN_ADDR",
        default_value = "127.0.0.1:8089"
    )]
    listen: String,

    /// Log level
    #[arg(long, env = "COEVO_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "COEVO_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| error::DaemonError::Config(e.to_string()))?;
    config.server.listen_addr = cli
        .listen
        .parse()
        .map_err(|e| error::DaemonError::Config(format!("invalid listen address: {}", e)))?;

    println!(
        r#"
                               _
   ___ ___   _____   _____  __| |
  / __/ _ \ / _ \ \ / / _ \/ _` |
 | (_| (_) |  __/\ V / (_) | (_| |
  \___\___/ \___| \_/ \___/ \__,_|

  Co-Evolution Playground Daemon
  Version: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr
    );

    let server = Server::new(config)?;
    server.run().await?;
    Ok(())
}
