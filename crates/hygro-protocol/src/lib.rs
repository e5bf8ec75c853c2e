//! Hygro Protocol - wire format for sensor/daemon communication
//!
//! The protocol is line-oriented and strictly request/response:
//!
//! - Report line (client → server): `<identifier> <temperature> <humidity>`
//! - Reply line (server → client): `<humidifier>.<led>.<buzzer>`
//! - Session-start notice burst (server → client, once per connection):
//!   one or more notice lines terminated by a single empty line
//!
//! Both binaries encode and decode through this crate, so the formats
//! cannot drift apart.

pub mod notice;
pub mod wire;

pub use notice::{encode_burst, is_end_of_burst, Notice};
pub use wire::{encode_reply, encode_report, parse_reply, parse_report, WireError};
