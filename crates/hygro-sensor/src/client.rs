//! The sensor client: connect, notice burst, report loop.
//!
//! Lifecycle:
//! 1. Connect to the daemon over TCP.
//! 2. Read the session-start notice burst (it ends at the empty line).
//!    A closing notice means the server is full; print what it said
//!    and exit cleanly.
//! 3. Every interval: draw a sample, send the report line, read the
//!    reply, apply it to the local panel, and print the transitions.
//!
//! The loop ends when the server closes the connection.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{debug, info};

use hygro_core::{DeviceIdentifier, SensorReport};
use hygro_protocol::{encode_report, is_end_of_burst, parse_reply, Notice, WireError};

use crate::panel::Panel;
use crate::sampler;

/// Configuration for one sensor client run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Identifier announced in every report.
    pub identifier: DeviceIdentifier,
    /// Delay between reports.
    pub interval: Duration,
}

/// Simulated sensor client.
pub struct SensorClient {
    config: ClientConfig,
    panel: Panel,
}

impl SensorClient {
    /// Creates a client from its configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            panel: Panel::new(),
        }
    }

    /// Runs the client until the server closes the connection.
    ///
    /// A rejected session (closing notice in the burst) is a clean
    /// exit, not an error; the server said everything there is to say.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let address = format!("{}:{}", self.config.host, self.config.port);
        info!(address = %address, identifier = %self.config.identifier, "Connecting");

        let stream = TcpStream::connect(&address)
            .await
            .map_err(|source| ClientError::Connect {
                address: address.clone(),
                source,
            })?;
        let (read_half, mut writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        if !read_notice_burst(&mut reader).await? {
            info!("Server declined the session");
            return Ok(());
        }

        loop {
            sleep(self.config.interval).await;

            let sample = sampler::sample();
            println!(
                "temperature: {} C, humidity: {} %",
                sample.temperature, sample.humidity
            );

            let report = SensorReport::new(
                self.config.identifier,
                sample.temperature,
                sample.humidity,
            );
            let line = format!("{}\n", encode_report(&report));
            writer.write_all(line.as_bytes()).await?;

            let mut reply = String::new();
            let bytes_read = reader.read_line(&mut reply).await?;
            if bytes_read == 0 {
                info!("Server closed the connection");
                return Ok(());
            }

            let code = parse_reply(&reply)?;
            debug!(reply = %code, "Reply received");

            for transition in self.panel.apply(&code) {
                println!("{}", transition.styled());
            }
            println!("----------------------------------------");
        }
    }
}

/// Reads the session-start notice burst, echoing each notice.
///
/// Returns `false` if the burst carried the closing notice (the server
/// rejected the session) or was cut short, `true` when the session is
/// live.
async fn read_notice_burst(reader: &mut BufReader<OwnedReadHalf>) -> Result<bool, ClientError> {
    let mut admitted = true;
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(false);
        }
        if is_end_of_burst(&line) {
            return Ok(admitted);
        }

        println!("{}", line.trim_end());
        if Notice::from_text(&line) == Some(Notice::Closing) {
            admitted = false;
        }
    }
}

/// Errors that can end a client run.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] WireError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Connect {
            address: "127.0.0.1:9190".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(err.to_string().starts_with("Failed to connect to 127.0.0.1:9190:"));
    }
}
