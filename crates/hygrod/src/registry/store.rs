//! Durable backing store for the device registry.
//!
//! One record per line, tab-separated:
//! `identifier <TAB> source address <TAB> location`. The file is
//! append-only; records are never rewritten, so a crash can at worst
//! truncate the last line, and loading skips anything it cannot parse.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use hygro_core::{DeviceIdentifier, DeviceRecord};

/// Flat-file table of registered devices.
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    /// Creates a store backed by the given table file.
    ///
    /// The file itself is created lazily on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the table file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every well-formed record from the table, in file order.
    ///
    /// A missing file is an empty table. Lines that fail to parse are
    /// skipped with a warning; a corrupt record must not keep the
    /// daemon from starting.
    pub fn load(&self) -> io::Result<Vec<DeviceRecord>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut records = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(record) => records.push(record),
                None => {
                    warn!(
                        table = %self.path.display(),
                        line = number + 1,
                        "Skipping malformed table line"
                    );
                }
            }
        }
        Ok(records)
    }

    /// Appends one record to the table.
    pub fn append(&self, record: &DeviceRecord) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(encode_line(record).as_bytes())?;
        Ok(())
    }
}

/// Renders one record as its table line, trailing newline included.
fn encode_line(record: &DeviceRecord) -> String {
    format!(
        "{}\t{}\t{}\n",
        record.identifier, record.source_address, record.location
    )
}

/// Parses one table line; `None` if malformed.
fn parse_line(line: &str) -> Option<DeviceRecord> {
    let mut fields = line.split('\t');
    let identifier = DeviceIdentifier::from_str(fields.next()?).ok()?;
    let source_address = fields.next()?.to_string();
    let location = fields.next()?.to_string();
    if fields.next().is_some() {
        return None;
    }
    Some(DeviceRecord {
        identifier,
        source_address,
        location,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DeviceRecord {
        DeviceRecord::first_seen("1.2.3.1".parse().unwrap(), "10.0.0.7")
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("absent.tsv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("table.tsv"));

        let record = sample_record();
        store.append(&record).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[test]
    fn test_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("table.tsv"));
        store.append(&sample_record()).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "1.2.3.1\t10.0.0.7\tBuilding A, floor 2, room 3, temperature/humidity sensor\n"
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv");
        std::fs::write(
            &path,
            "not a record\n\
             9.9.9.9\t10.0.0.1\tnowhere\n\
             2.0.0.2\t10.0.0.2\tBuilding B, status LED\n\
             1.1.1.1\t10.0.0.3\n",
        )
        .unwrap();

        let store = TableStore::new(&path);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].identifier.to_string(), "2.0.0.2");
        assert_eq!(loaded[0].location, "Building B, status LED");
    }

    #[test]
    fn test_extra_fields_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv");
        std::fs::write(&path, "1.1.1.1\t10.0.0.3\tBuilding A\textra\n").unwrap();

        let store = TableStore::new(&path);
        assert!(store.load().unwrap().is_empty());
    }
}
