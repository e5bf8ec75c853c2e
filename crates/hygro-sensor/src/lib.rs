//! Hygro Sensor - simulated temperature/humidity sensor client
//!
//! This crate provides the client side of the hygro system:
//! - `sampler` - random readings (temperature 10..=30, humidity 0..=99)
//! - `panel` - local humidifier/LED/buzzer panel and its transitions
//! - `client` - connection lifecycle and the report loop

pub mod client;
pub mod panel;
pub mod sampler;

pub use client::{ClientConfig, ClientError, SensorClient};
pub use panel::{Panel, Transition};
pub use sampler::{sample, SensorSample};
