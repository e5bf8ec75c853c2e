//! Device-identity registry: lookup on repeat sight, create on first.
//!
//! The registry owns an in-memory index (identifier to record)
//! mirroring a durable tab-separated table. Every lookup and
//! registration goes through one mutex, and a registration holds that
//! lock across its whole not-found / append / insert sequence, so two
//! sessions racing to register the same identifier always produce
//! exactly one record; the loser observes the winner's.
//!
//! A store append that fails mid-registration degrades to an
//! in-memory-only record: the device re-registers after a restart at
//! worst, and the control loop keeps serving.

mod store;

pub use store::TableStore;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use hygro_core::{DeviceIdentifier, DeviceRecord};

/// Shared handle to the device registry.
///
/// Cloning is cheap; all clones share one index and one store.
#[derive(Clone)]
pub struct DeviceRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

struct RegistryInner {
    index: HashMap<DeviceIdentifier, DeviceRecord>,
    store: TableStore,
}

impl DeviceRegistry {
    /// Opens the registry, rehydrating the index from the table file.
    ///
    /// A missing file starts an empty registry. Records whose
    /// identifier repeats an earlier line are ignored (first
    /// occurrence wins), matching lookup order in the durable table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let store = TableStore::new(path.as_ref());
        let records = store.load().map_err(|source| RegistryError::Open {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            match index.entry(record.identifier) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(_) => {
                    warn!(
                        identifier = %record.identifier,
                        "Duplicate table entry ignored"
                    );
                }
            }
        }

        info!(
            table = %store.path().display(),
            devices = index.len(),
            "Device registry opened"
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(RegistryInner { index, store })),
        })
    }

    /// Looks up an existing record; `None` if the identifier is unseen.
    pub async fn resolve(&self, identifier: &DeviceIdentifier) -> Option<DeviceRecord> {
        self.inner.lock().await.index.get(identifier).cloned()
    }

    /// Registers a first-seen identifier, or returns the record that
    /// already exists for it.
    ///
    /// The index check, store append, and index insert all happen
    /// under one continuous lock acquisition, which makes registration
    /// idempotent under concurrency: at most one record ever exists
    /// per identifier, and the source address is fixed at creation.
    pub async fn register(
        &self,
        identifier: DeviceIdentifier,
        source_address: impl Into<String>,
    ) -> DeviceRecord {
        let mut inner = self.inner.lock().await;

        if let Some(existing) = inner.index.get(&identifier) {
            return existing.clone();
        }

        let record = DeviceRecord::first_seen(identifier, source_address);

        if let Err(e) = inner.store.append(&record) {
            warn!(
                identifier = %identifier,
                error = %e,
                "Failed to persist device record; keeping it in memory"
            );
        }

        inner.index.insert(identifier, record.clone());
        debug!(
            identifier = %identifier,
            location = %record.location,
            "Registered new device"
        );
        record
    }

    /// Returns the number of registered devices.
    pub async fn device_count(&self) -> usize {
        self.inner.lock().await.index.len()
    }
}

/// Errors that can occur while opening the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read device table {path}: {source}")]
    Open { path: String, source: io::Error },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_missing_table_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::open(dir.path().join("table.tsv")).unwrap();
        assert_eq!(registry.device_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_composes_location() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::open(dir.path().join("table.tsv")).unwrap();

        let record = registry.register("1.2.3.1".parse().unwrap(), "10.0.0.7").await;
        assert_eq!(
            record.location,
            "Building A, floor 2, room 3, temperature/humidity sensor"
        );
        assert_eq!(record.source_address, "10.0.0.7");
    }

    #[tokio::test]
    async fn test_register_keeps_first_source_address() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::open(dir.path().join("table.tsv")).unwrap();
        let id: DeviceIdentifier = "2.1.1.1".parse().unwrap();

        let first = registry.register(id, "10.0.0.1").await;
        let second = registry.register(id, "10.0.0.2").await;

        assert_eq!(first, second);
        assert_eq!(second.source_address, "10.0.0.1");
        assert_eq!(registry.device_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_table_lines_first_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv");
        std::fs::write(
            &path,
            "1.1.1.1\t10.0.0.1\tBuilding A, floor 1, room 1, temperature/humidity sensor\n\
             1.1.1.1\t10.0.0.2\tBuilding A, floor 1, room 1, temperature/humidity sensor\n",
        )
        .unwrap();

        let registry = DeviceRegistry::open(&path).unwrap();
        assert_eq!(registry.device_count().await, 1);

        let record = registry.resolve(&"1.1.1.1".parse().unwrap()).await.unwrap();
        assert_eq!(record.source_address, "10.0.0.1");
    }
}
