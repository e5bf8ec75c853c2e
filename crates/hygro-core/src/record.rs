//! Sensor reports and registered device records.

use crate::identifier::DeviceIdentifier;

/// One temperature/humidity reading from a device.
///
/// Ephemeral: decoded from a single report line, consumed immediately
/// by the decision engine, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReport {
    pub identifier: DeviceIdentifier,
    pub temperature: i32,
    pub humidity: i32,
}

impl SensorReport {
    /// Creates a report for one reading.
    pub fn new(identifier: DeviceIdentifier, temperature: i32, humidity: i32) -> Self {
        Self {
            identifier,
            temperature,
            humidity,
        }
    }
}

/// A registered device as held by the registry and its durable table.
///
/// Created exactly once per unique identifier, on the first report from
/// that identifier. `source_address` is fixed at creation; later
/// sightings from a different peer do not rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub identifier: DeviceIdentifier,
    pub source_address: String,
    pub location: String,
}

impl DeviceRecord {
    /// Creates the record for a first-seen identifier, composing its
    /// location from the segment name tables.
    pub fn first_seen(identifier: DeviceIdentifier, source_address: impl Into<String>) -> Self {
        let location = identifier.location();
        Self {
            identifier,
            source_address: source_address.into(),
            location,
        }
    }
}
