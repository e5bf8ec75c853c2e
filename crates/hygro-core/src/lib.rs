//! Hygro Core - Shared types for environmental control
//!
//! This crate provides the domain types shared between the server
//! daemon (hygrod) and the sensor client (hygro-sensor):
//!
//! - `identifier` - Device identity segments and location names
//! - `actuation` - Humidifier/LED/buzzer control states
//! - `decision` - The pure temperature/humidity decision policy
//! - `record` - Sensor reports and registered device records
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod actuation;
pub mod decision;
pub mod identifier;
pub mod record;

// Re-exports for convenience
pub use actuation::{ActuationCode, BuzzerState, HumidifierState, LedColor};
pub use decision::{decide, optimal_humidity};
pub use identifier::{DeviceIdentifier, Floor, IdentifierError, Room, SensorKind, Site};
pub use record::{DeviceRecord, SensorReport};
