//! Undertow CLI - magnet streaming server
//!
//! Boots the streaming endpoint with the simulated swarm engine. Real
//! deployments embed `undertow_web::run_server` with a production engine.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use undertow_core::swarm::SimSwarmEngine;
use undertow_core::tracing_setup::{CliLogLevel, init_tracing};
use undertow_core::{UndertowConfig, UndertowError};

#[derive(Parser)]
#[command(name = "undertow")]
#[command(about = "A magnet-URI media streaming server")]
struct Cli {
    /// Address to bind the streaming server to
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Swarm discovery timeout in milliseconds; 0 disables the timeout
    #[arg(long)]
    stream_timeout_ms: Option<u64>,

    /// Console log level
    #[arg(long, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    /// Directory for the full debug log
    #[arg(long)]
    logs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> undertow_core::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref()).map_err(|error| {
        UndertowError::Configuration {
            reason: error.to_string(),
        }
    })?;

    let mut config = UndertowConfig::from_env();
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(millis) = cli.stream_timeout_ms {
        config.stream.readiness_timeout = Duration::from_millis(millis);
    }

    info!(
        timeout = ?config.stream.readiness_timeout,
        "starting with the simulated swarm engine"
    );
    let engine = Arc::new(SimSwarmEngine::demo());
    undertow_web::run_server(config, engine).await
}
