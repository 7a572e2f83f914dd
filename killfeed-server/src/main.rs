//! killfeed server
//!
//! Watches zKillboard for kills involving configured corporations and
//! alliances and posts them to a Slack channel.

mod config;
mod server;
mod shutdown;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{ConfigError, ConfigLoader};
use server::{build_router, run_server};
use shutdown::shutdown_signal;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// killfeed - zKillboard to Slack kill notifier
#[derive(Parser, Debug)]
#[command(name = "killfeed-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./killfeed.toml")]
    config: PathBuf,

    /// Override the health endpoint listen address (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Emit logs as JSON lines
    #[arg(long, env = "KILLFEED_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Follow the zKillboard websocket kill stream
    Stream,
    /// Long-poll the RedisQ queue and fetch each killmail from ESI
    Poll,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_json);

    tracing::info!(
        mode = ?args.command,
        "Starting killfeed-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = ConfigLoader::new(&args.config, args.listen)
        .load(args.command == Command::Stream)
        .inspect_err(|e| match e {
            ConfigError::ValidationError(problems) => {
                for problem in problems {
                    tracing::error!(problem = %problem, "Invalid configuration");
                }
            }
            other => tracing::error!(error = %other, "Failed to load configuration"),
        })?;

    tracing::info!(
        path = ?args.config,
        watched = config.watched_ids.len(),
        webhook = config.slack_webhook_url.is_some(),
        "Configuration loaded"
    );
    if config.watched_ids.is_empty() {
        tracing::warn!("No watched IDs configured, every kill will be reported");
    }

    let listen_addr = config.listen;
    let state = AppState::new(config).context("failed to build HTTP clients")?;
    let router = build_router(state.health.clone());
    let server = tokio::spawn(run_server(router, listen_addr));

    let driver = async {
        match args.command {
            Command::Stream => {
                state.killstream_listener().run().await;
                Ok::<(), anyhow::Error>(())
            }
            Command::Poll => {
                tracing::info!(queue_id = %state.config.queue_id, "Polling RedisQ");
                let poller = state.queue_poller().context("failed to build RedisQ client")?;
                Err(anyhow::Error::new(poller.run().await))
            }
        }
    };

    tokio::select! {
        result = driver => result,
        result = server => {
            result
                .context("health endpoint task panicked")?
                .context("health endpoint stopped")
        }
        result = shutdown_signal() => {
            result.context("failed to install signal handlers")
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
