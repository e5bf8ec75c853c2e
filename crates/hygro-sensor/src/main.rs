//! hygro-sensor - simulated sensor client binary
//!
//! Connects to a hygrod server, reports random temperature and
//! humidity readings at a fixed interval, and renders every actuation
//! reply on a local panel.
//!
//! # Usage
//!
//! ```bash
//! # Report to a local server every 5 seconds
//! hygro-sensor 127.0.0.1 9190
//!
//! # A specific device, reporting every second
//! hygro-sensor 10.0.0.1 9190 --identifier 2.1.3.1 --interval 1
//! ```

use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hygro_core::DeviceIdentifier;
use hygro_sensor::{ClientConfig, SensorClient};

/// hygro sensor - simulated temperature/humidity reporter
#[derive(Parser, Debug)]
#[command(name = "hygro-sensor", version, about)]
struct Args {
    /// Server host name or address
    host: String,

    /// Server TCP port
    port: u16,

    /// Device identifier to report as (site.floor.room.kind)
    #[arg(long, default_value = "1.1.1.1")]
    identifier: DeviceIdentifier,

    /// Seconds between reports
    #[arg(long, default_value_t = 5)]
    interval: u64,
}

fn main() -> Result<()> {
    // Usage errors exit with status 1, like connection failures;
    // --help and --version keep clap's normal exit.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    run_client(args)
}

#[tokio::main]
async fn run_client(args: Args) -> Result<()> {
    // Diagnostics go to stderr so the panel output owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hygro_sensor=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let client = SensorClient::new(ClientConfig {
        host: args.host,
        port: args.port,
        identifier: args.identifier,
        interval: Duration::from_secs(args.interval),
    });

    client.run().await?;
    Ok(())
}
