//! Per-connection session loop.
//!
//! One `Session` per admitted connection, owned by its task. The loop
//! reads one report line at a time, resolves the device (registering
//! it on first sight), runs the decision policy, and writes the reply
//! on the same connection: one outstanding report at a time, replies
//! in arrival order. EOF or a protocol error ends the session, and
//! teardown always releases the connection slot and logs the
//! disconnect, whatever ended the loop.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use hygro_core::decide;
use hygro_protocol::{encode_reply, parse_report, WireError};

use crate::eventlog::{EventLog, LogEvent};
use crate::registry::DeviceRegistry;
use crate::server::{ConnectionId, ConnectionSet};

/// Server-side state for one client connection.
pub struct Session {
    id: ConnectionId,
    peer: SocketAddr,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    registry: DeviceRegistry,
    connections: ConnectionSet,
    events: EventLog,
}

impl Session {
    /// Creates a session over an admitted connection.
    pub fn new(
        stream: TcpStream,
        id: ConnectionId,
        peer: SocketAddr,
        registry: DeviceRegistry,
        connections: ConnectionSet,
        events: EventLog,
    ) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            id,
            peer,
            reader: BufReader::new(reader),
            writer,
            registry,
            connections,
            events,
        }
    }

    /// Runs the session until EOF or a protocol error.
    ///
    /// Consumes the session. Teardown (slot release plus disconnect
    /// audit line) always runs, whatever ended the loop.
    pub async fn run(mut self) {
        self.events
            .append(&LogEvent::Connected {
                connection: self.id,
                peer: self.peer.ip().to_string(),
            })
            .await;

        match self.serve().await {
            Ok(()) => {
                debug!(connection = self.id, peer = %self.peer, "Client closed the connection");
            }
            Err(e) => {
                warn!(connection = self.id, peer = %self.peer, error = %e, "Session ended on error");
            }
        }

        self.connections.release(self.id).await;
        self.events
            .append(&LogEvent::Disconnected {
                connection: self.id,
                peer: self.peer.ip().to_string(),
            })
            .await;
        debug!(connection = self.id, "Session torn down");
    }

    /// The report/reply loop proper.
    async fn serve(&mut self) -> Result<(), SessionError> {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self.reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                return Ok(());
            }

            self.handle_report(&line).await?;
        }
    }

    /// Processes one report line end-to-end.
    async fn handle_report(&mut self, line: &str) -> Result<(), SessionError> {
        let report = parse_report(line)?;

        let record = match self.registry.resolve(&report.identifier).await {
            Some(record) => record,
            None => {
                self.registry
                    .register(report.identifier, self.peer.ip().to_string())
                    .await
            }
        };

        let code = decide(report.temperature, report.humidity);
        let reply = format!("{}\n", encode_reply(&code));
        self.writer.write_all(reply.as_bytes()).await?;

        debug!(
            connection = self.id,
            identifier = %report.identifier,
            temperature = report.temperature,
            humidity = report.humidity,
            reply = %code,
            "Report served"
        );

        self.events
            .append(&LogEvent::Report {
                peer: self.peer.ip().to_string(),
                location: record.location.clone(),
            })
            .await;

        Ok(())
    }
}

/// Why a session loop stopped.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] WireError),
}

// ============================================================================
// Tests
// ============================================================================
