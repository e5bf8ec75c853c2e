//! Operator-facing event log.
//!
//! Distinct from the `tracing` diagnostics: this is the audit trail an
//! operator reads after the fact. Entries land under
//! `<root>/<YYYY>-<MM>/<DD>.log`, one line each, prefixed with a
//! `[YYYY.MM.DD HH:MM:SS]` local timestamp. A single mutex serializes
//! writers so concurrent sessions never interleave partial lines. A
//! failed write is warned about and dropped, never fatal.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::warn;

use crate::server::ConnectionId;

/// One loggable session event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A client connection was admitted.
    Connected {
        connection: ConnectionId,
        peer: String,
    },
    /// A report was served for a registered device.
    Report { peer: String, location: String },
    /// A client connection ended.
    Disconnected {
        connection: ConnectionId,
        peer: String,
    },
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { connection, peer } => {
                write!(f, "client [{connection}] connected, ip: {peer}")
            }
            Self::Report { peer, location } => {
                write!(f, "client ip: [{peer}], location: [{location}]")
            }
            Self::Disconnected { connection, peer } => {
                write!(f, "client [{connection}] disconnected, ip: {peer}")
            }
        }
    }
}

/// Append-only event-log sink, sharded into month directories.
///
/// Cloning is cheap; all clones share one writer lock.
#[derive(Clone)]
pub struct EventLog {
    root: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl EventLog {
    /// Creates a sink rooted at the given directory.
    ///
    /// Directories and day files are created on demand at write time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the log root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Appends one event, stamped with the current local time.
    ///
    /// Failures are warned about and swallowed: a missed audit line
    /// must not take a session down.
    pub async fn append(&self, event: &LogEvent) {
        let _guard = self.guard.lock().await;
        if let Err(e) = self.write_entry(Local::now(), event) {
            warn!(error = %e, "Failed to append event log entry");
        }
    }

    fn write_entry(&self, now: DateTime<Local>, event: &LogEvent) -> std::io::Result<()> {
        let dir = self.root.join(now.format("%Y-%m").to_string());
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.log", now.format("%d")));
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "[{}] {}", now.format("%Y.%m.%d %H:%M:%S"), event)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
