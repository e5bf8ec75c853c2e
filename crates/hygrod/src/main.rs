//! hygrod - environmental control daemon binary
//!
//! Accepts sensor connections on a TCP port, answers every
//! temperature/humidity report with an actuation code, and records
//! first-seen devices in a durable table.
//!
//! # Usage
//!
//! ```bash
//! # Listen on port 9190 with defaults
//! hygrod 9190
//!
//! # Custom table and log locations, higher capacity
//! hygrod 9190 --table /var/lib/hygro/mib_table.tsv --log-dir /var/log/hygro --capacity 25
//!
//! # Load settings from a TOML file (flags still win)
//! hygrod 9190 --config hygrod.toml
//!
//! # Enable debug logging
//! RUST_LOG=hygrod=debug hygrod 9190
//! ```
//!
//! # Signal Handling
//!
//! SIGTERM and SIGINT trigger a graceful shutdown: the acceptor stops
//! taking connections and the process exits.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hygrod::config::ServerConfig;
use hygrod::eventlog::EventLog;
use hygrod::registry::DeviceRegistry;
use hygrod::server::Server;

/// hygro daemon - environmental control server
#[derive(Parser, Debug)]
#[command(name = "hygrod", version, about)]
struct Args {
    /// TCP port to listen on
    port: u16,

    /// Path of the device table (default: mib_table.tsv)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Root directory of the event-log tree (default: logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Maximum number of concurrent clients (default: 10)
    #[arg(long)]
    capacity: Option<usize>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Usage errors exit with status 1, like every other setup failure;
    // --help and --version keep clap's normal exit.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    run_daemon(args)
}

/// Merges the configuration file (if any) with command-line overrides.
fn effective_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(table) = &args.table {
        config.table = table.clone();
    }
    if let Some(log_dir) = &args.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }

    Ok(config)
}

#[tokio::main]
async fn run_daemon(args: Args) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("hygrod=info".parse()?)
                .add_directive("hygro_core=info".parse()?)
                .add_directive("hygro_protocol=info".parse()?),
        )
        .init();

    let config = effective_config(&args)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        capacity = config.capacity,
        "hygro daemon starting"
    );

    let cancel_token = CancellationToken::new();

    // Signal handler task for graceful shutdown
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        info!("Shutdown signal received");
        shutdown_token.cancel();
    });

    let registry = DeviceRegistry::open(&config.table)
        .with_context(|| format!("Failed to open device table {}", config.table.display()))?;
    let events = EventLog::new(&config.log_dir);

    let listener = TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind TCP port {}", args.port))?;

    let server = Server::new(registry, events, config.capacity, cancel_token);
    server.run(listener).await;

    info!("hygro daemon stopped");
    Ok(())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
