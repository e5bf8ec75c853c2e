//! TCP acceptor for the hygro daemon.
//!
//! The server:
//! - Listens on a TCP port for sensor connections
//! - Gates admission on the shared connection set (capacity 10 by
//!   default)
//! - Answers each accept with the session-start notice burst, or the
//!   rejection notices when the set is full
//! - Spawns a `Session` task per admitted connection
//! - Supports graceful shutdown via `CancellationToken`

mod connections;
mod session;

pub use connections::{CapacityExceeded, ConnectionId, ConnectionSet};
pub use session::{Session, SessionError};

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use hygro_protocol::{encode_burst, Notice};

use crate::eventlog::EventLog;
use crate::registry::DeviceRegistry;

/// TCP server for the hygro daemon.
pub struct Server {
    registry: DeviceRegistry,
    events: EventLog,
    connections: ConnectionSet,
    cancel_token: CancellationToken,
    connection_counter: AtomicU64,
}

impl Server {
    /// Creates a server around its shared state.
    pub fn new(
        registry: DeviceRegistry,
        events: EventLog,
        capacity: usize,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            registry,
            events,
            connections: ConnectionSet::new(capacity),
            cancel_token,
            connection_counter: AtomicU64::new(0),
        }
    }

    /// Returns the connection set shared with every session.
    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    /// Accepts connections on the listener until cancelled.
    ///
    /// The listener is bound by the caller, keeping socket setup a
    /// startup concern. Accept errors are logged and the loop
    /// continues; only cancellation stops it.
    pub async fn run(&self, listener: TcpListener) {
        info!(
            capacity = self.connections.capacity(),
            "Server accepting connections"
        );

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    info!("Server shutdown requested");
                    break;
                }

                result = listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let id = self.connection_counter.fetch_add(1, Ordering::Relaxed);
                            self.handle_connection(stream, id, peer);
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
            }
        }

        info!("Server stopped");
    }

    /// Admits or rejects one accepted connection on its own task, so a
    /// slow peer never stalls the accept loop.
    fn handle_connection(&self, stream: TcpStream, id: ConnectionId, peer: SocketAddr) {
        let registry = self.registry.clone();
        let connections = self.connections.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut stream = stream;
            match connections.try_admit(id, peer).await {
                Ok(active) => {
                    let burst = encode_burst(&[Notice::Welcome]);
                    if let Err(e) = stream.write_all(burst.as_bytes()).await {
                        warn!(
                            connection = id,
                            peer = %peer,
                            error = %e,
                            "Failed to send session-start notice; dropping connection"
                        );
                        connections.release(id).await;
                        return;
                    }

                    info!(connection = id, peer = %peer, active, "Client admitted");
                    Session::new(stream, id, peer, registry, connections, events)
                        .run()
                        .await;
                }
                Err(CapacityExceeded { capacity }) => {
                    info!(connection = id, peer = %peer, capacity, "Client rejected: at capacity");

                    let burst = encode_burst(&[Notice::TooManyConnections, Notice::Closing]);
                    if let Err(e) = stream.write_all(burst.as_bytes()).await {
                        debug!(connection = id, error = %e, "Failed to send rejection notices");
                    }
                    // Dropping the stream closes the rejected connection.
                }
            }
        });
    }
}
