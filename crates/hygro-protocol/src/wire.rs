//! Report and reply line codecs.
//!
//! One exchange per report: the client writes a single report line, the
//! server answers with a single reply line. Parsing is strict — a line
//! that does not match the format exactly is a [`WireError`], which the
//! server treats as fatal to the offending session only.

use std::str::FromStr;

use thiserror::Error;

use hygro_core::{
    ActuationCode, BuzzerState, DeviceIdentifier, HumidifierState, IdentifierError, LedColor,
    SensorReport,
};

// ============================================================================
// Report Lines
// ============================================================================

/// Encodes a sensor report as its wire line (no trailing newline).
pub fn encode_report(report: &SensorReport) -> String {
    format!(
        "{} {} {}",
        report.identifier, report.temperature, report.humidity
    )
}

/// Parses a report line into a typed [`SensorReport`].
///
/// The line must hold exactly three whitespace-separated fields:
/// identifier, temperature, humidity. The device identifier is
/// validated here, once, at the boundary — everything past this point
/// works with typed segments.
pub fn parse_report(line: &str) -> Result<SensorReport, WireError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(WireError::FieldCount {
            found: fields.len(),
        });
    }

    let raw_identifier = field(&fields, 0)?;
    let identifier = DeviceIdentifier::from_str(raw_identifier)?;
    let temperature = numeric_field(&fields, 1, "temperature")?;
    let humidity = numeric_field(&fields, 2, "humidity")?;

    Ok(SensorReport::new(identifier, temperature, humidity))
}

// ============================================================================
// Reply Lines
// ============================================================================

/// Encodes an actuation code as its wire line (no trailing newline).
pub fn encode_reply(code: &ActuationCode) -> String {
    code.to_string()
}

/// Parses a reply line back into a typed [`ActuationCode`].
pub fn parse_reply(line: &str) -> Result<ActuationCode, WireError> {
    let parts: Vec<&str> = line.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(WireError::CodeCount { found: parts.len() });
    }

    let humidifier_code = code_field(&parts, 0, "humidifier")?;
    let humidifier =
        HumidifierState::from_code(humidifier_code).ok_or(WireError::UnknownCode {
            field: "humidifier",
            code: humidifier_code,
        })?;

    let led_code = code_field(&parts, 1, "led")?;
    let led = LedColor::from_code(led_code).ok_or(WireError::UnknownCode {
        field: "led",
        code: led_code,
    })?;

    let buzzer_code = code_field(&parts, 2, "buzzer")?;
    let buzzer = BuzzerState::from_code(buzzer_code).ok_or(WireError::UnknownCode {
        field: "buzzer",
        code: buzzer_code,
    })?;

    Ok(ActuationCode::new(humidifier, led, buzzer))
}

// ============================================================================
// Field Helpers
// ============================================================================

fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, WireError> {
    fields.get(index).copied().ok_or(WireError::FieldCount {
        found: fields.len(),
    })
}

fn numeric_field(fields: &[&str], index: usize, name: &'static str) -> Result<i32, WireError> {
    let raw = field(fields, index)?;
    raw.parse::<i32>().map_err(|_| WireError::NotNumeric {
        field: name,
        value: raw.to_string(),
    })
}

fn code_field(parts: &[&str], index: usize, name: &'static str) -> Result<u32, WireError> {
    let raw = parts.get(index).copied().ok_or(WireError::CodeCount {
        found: parts.len(),
    })?;
    raw.parse::<u32>().map_err(|_| WireError::NotNumeric {
        field: name,
        value: raw.to_string(),
    })
}

/// Errors produced when decoding wire lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Report line does not hold exactly three whitespace-separated fields
    #[error("Expected three report fields (identifier, temperature, humidity), found {found}")]
    FieldCount { found: usize },

    /// Reply line does not hold exactly three dot-separated codes
    #[error("Expected three reply codes (humidifier, led, buzzer), found {found}")]
    CodeCount { found: usize },

    /// A numeric field failed to parse
    #[error("Invalid {field} field: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    /// A reply code is outside its known enumeration
    #[error("Unknown {field} code: {code}")]
    UnknownCode { field: &'static str, code: u32 },

    /// The report's device identifier failed validation
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(#[from] IdentifierError),
}
