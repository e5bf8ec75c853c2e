//! hygrod - environmental control daemon
//!
//! This crate provides the server side of the hygro system:
//! - `server` - TCP acceptor, capacity gate, per-connection sessions
//! - `registry` - durable device-identity registry
//! - `eventlog` - operator-facing audit log
//! - `config` - daemon configuration (defaults, TOML file, CLI overrides)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      hygrod daemon                       │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  ┌────────────┐  admit/reject  ┌─────────────────────┐   │
//! │  │   Server   │───────────────▶│    ConnectionSet    │   │
//! │  │ (acceptor) │                │   (capacity gate)   │   │
//! │  └─────┬──────┘                └─────────────────────┘   │
//! │        │ spawn per connection                            │
//! │        ▼                                                 │
//! │  ┌────────────┐  resolve /     ┌─────────────────────┐   │
//! │  │  Session   │──register─────▶│   DeviceRegistry    │   │
//! │  │  (report   │                │  (index + table)    │   │
//! │  │   loop)    │──audit lines──▶│      EventLog       │   │
//! │  └────────────┘                └─────────────────────┘   │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every report is answered on the connection it arrived on, in
//! arrival order. Device identity is resolved against the registry
//! (registering first-seen identifiers), the actuation decision is
//! pure computation from `hygro-core`, and both connection lifecycle
//! and served reports land in the event log.
//!
//! All production code avoids `.unwrap()` and `.expect()`; fallible
//! operations return `Result`, and failures that must not end a
//! session (event-log writes, table appends) are logged and degraded.

pub mod config;
pub mod eventlog;
pub mod registry;
pub mod server;
