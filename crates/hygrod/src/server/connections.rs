//! The live-connection set and its capacity gate.
//!
//! One process-wide set tracks every admitted connection. It is
//! guarded by a single mutex, and the capacity check plus insertion is
//! one locked operation, so concurrent accepts can never push the set
//! past capacity.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

/// Identifier for one accepted connection, unique within a server run.
pub type ConnectionId = u64;

/// Mutex-guarded set of live connections.
///
/// Cloning is cheap; all clones share the same set.
#[derive(Clone)]
pub struct ConnectionSet {
    live: Arc<Mutex<HashMap<ConnectionId, SocketAddr>>>,
    capacity: usize,
}

impl ConnectionSet {
    /// Creates an empty set with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            live: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// Admits a connection if the set is below capacity.
    ///
    /// Check and insert happen under one lock acquisition; two accepts
    /// racing for the last slot cannot both win. Returns the number of
    /// live connections after insertion.
    pub async fn try_admit(
        &self,
        id: ConnectionId,
        peer: SocketAddr,
    ) -> Result<usize, CapacityExceeded> {
        let mut live = self.live.lock().await;
        if live.len() >= self.capacity {
            return Err(CapacityExceeded {
                capacity: self.capacity,
            });
        }
        live.insert(id, peer);
        Ok(live.len())
    }

    /// Removes a connection at session teardown.
    ///
    /// Returns the peer address if the connection was present.
    pub async fn release(&self, id: ConnectionId) -> Option<SocketAddr> {
        self.live.lock().await.remove(&id)
    }

    /// Returns the number of live connections.
    pub async fn active(&self) -> usize {
        self.live.lock().await.len()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Outcome of an accept that found the server full.
///
/// Not a fault: the acceptor answers it with the rejection and closing
/// notices, then drops the connection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Too many connections (capacity: {capacity})")]
pub struct CapacityExceeded {
    pub capacity: usize,
}

// ============================================================================
// Tests
// ============================================================================
