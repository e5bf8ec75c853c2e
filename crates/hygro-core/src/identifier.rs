//! Device identity: dotted four-segment identifiers and location names.
//!
//! Every reporting device identifies itself with a dotted token of the
//! form `site.floor.room.kind` (e.g. `1.2.3.1`). Each segment is drawn
//! from a small closed set, so the token is parsed exactly once at the
//! wire boundary into typed segments; nothing downstream handles
//! loosely-typed identifier strings.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifier Segments
// ============================================================================

/// Site segment (first position): which building the device lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    /// Building A (code 1)
    BuildingA,
    /// Building B (code 2)
    BuildingB,
}

impl Site {
    /// Parses a site from its numeric code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::BuildingA),
            2 => Some(Self::BuildingB),
            _ => None,
        }
    }

    /// Returns the numeric code used in the dotted identifier form.
    pub fn code(&self) -> u32 {
        match self {
            Self::BuildingA => 1,
            Self::BuildingB => 2,
        }
    }

    /// Returns the site name used when composing locations.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuildingA => "Building A",
            Self::BuildingB => "Building B",
        }
    }
}

/// Floor segment (second position).
///
/// Code 0 means "no floor information" and contributes nothing to the
/// composed location text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Floor {
    /// No floor information (code 0)
    Unspecified,
    /// Floor 1 (code 1)
    First,
    /// Floor 2 (code 2)
    Second,
    /// Floor 3 (code 3)
    Third,
}

impl Floor {
    /// Parses a floor from its numeric code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Unspecified),
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// Returns the numeric code used in the dotted identifier form.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unspecified => 0,
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Returns the floor label, or `None` for [`Floor::Unspecified`].
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::First => Some("floor 1"),
            Self::Second => Some("floor 2"),
            Self::Third => Some("floor 3"),
        }
    }
}

/// Room segment (third position).
///
/// Code 0 means "no room information", like [`Floor::Unspecified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    /// No room information (code 0)
    Unspecified,
    /// Room 1 (code 1)
    First,
    /// Room 2 (code 2)
    Second,
    /// Room 3 (code 3)
    Third,
}

impl Room {
    /// Parses a room from its numeric code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Unspecified),
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// Returns the numeric code used in the dotted identifier form.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unspecified => 0,
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Returns the room label, or `None` for [`Room::Unspecified`].
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::First => Some("room 1"),
            Self::Second => Some("room 2"),
            Self::Third => Some("room 3"),
        }
    }
}

/// Sensor-kind segment (fourth position): what the device is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Combined temperature/humidity sensor (code 1)
    TempHumidity,
    /// Status LED unit (code 2)
    StatusLed,
    /// Buzzer unit (code 3)
    Buzzer,
}

impl SensorKind {
    /// Parses a sensor kind from its numeric code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::TempHumidity),
            2 => Some(Self::StatusLed),
            3 => Some(Self::Buzzer),
            _ => None,
        }
    }

    /// Returns the numeric code used in the dotted identifier form.
    pub fn code(&self) -> u32 {
        match self {
            Self::TempHumidity => 1,
            Self::StatusLed => 2,
            Self::Buzzer => 3,
        }
    }

    /// Returns the sensor-kind name used when composing locations.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TempHumidity => "temperature/humidity sensor",
            Self::StatusLed => "status LED",
            Self::Buzzer => "buzzer",
        }
    }
}

// ============================================================================
// Device Identifier
// ============================================================================

/// Typed device identifier parsed from the dotted wire token.
///
/// Hashable and cheap to copy, so it keys the registry index directly.
/// `Display` reproduces the dotted form, so `to_string` round-trips
/// through `parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceIdentifier {
    pub site: Site,
    pub floor: Floor,
    pub room: Room,
    pub kind: SensorKind,
}

impl DeviceIdentifier {
    /// Creates an identifier from its four segments.
    pub fn new(site: Site, floor: Floor, room: Room, kind: SensorKind) -> Self {
        Self {
            site,
            floor,
            room,
            kind,
        }
    }

    /// Composes the human-readable location from the segment name tables.
    ///
    /// Non-empty segment names are joined with `", "`; unspecified floor
    /// and room segments (code 0) contribute nothing.
    pub fn location(&self) -> String {
        let mut parts: Vec<&'static str> = Vec::with_capacity(4);
        parts.push(self.site.name());
        if let Some(name) = self.floor.name() {
            parts.push(name);
        }
        if let Some(name) = self.room.name() {
            parts.push(name);
        }
        parts.push(self.kind.name());
        parts.join(", ")
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.site.code(),
            self.floor.code(),
            self.room.code(),
            self.kind.code()
        )
    }
}

impl FromStr for DeviceIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(IdentifierError::SegmentCount { found: parts.len() });
        }

        let site_code = segment_code(&parts, 0, "site")?;
        let floor_code = segment_code(&parts, 1, "floor")?;
        let room_code = segment_code(&parts, 2, "room")?;
        let kind_code = segment_code(&parts, 3, "sensor kind")?;

        let site = Site::from_code(site_code).ok_or(IdentifierError::UnknownCode {
            segment: "site",
            code: site_code,
        })?;
        let floor = Floor::from_code(floor_code).ok_or(IdentifierError::UnknownCode {
            segment: "floor",
            code: floor_code,
        })?;
        let room = Room::from_code(room_code).ok_or(IdentifierError::UnknownCode {
            segment: "room",
            code: room_code,
        })?;
        let kind = SensorKind::from_code(kind_code).ok_or(IdentifierError::UnknownCode {
            segment: "sensor kind",
            code: kind_code,
        })?;

        Ok(Self::new(site, floor, room, kind))
    }
}

/// Extracts one dotted segment as a numeric code.
fn segment_code(
    parts: &[&str],
    index: usize,
    segment: &'static str,
) -> Result<u32, IdentifierError> {
    let raw = parts
        .get(index)
        .ok_or(IdentifierError::SegmentCount { found: parts.len() })?;

    raw.parse::<u32>().map_err(|_| IdentifierError::NotNumeric {
        segment,
        value: (*raw).to_string(),
    })
}

/// Errors produced when parsing a device identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Wrong number of dot-separated segments (exactly four expected)
    #[error("Expected four dot-separated segments, found {found}")]
    SegmentCount { found: usize },

    /// A segment is not a valid non-negative number
    #[error("Invalid {segment} segment: {value:?}")]
    NotNumeric { segment: &'static str, value: String },

    /// A segment's numeric code is outside its known enumeration
    #[error("Unknown {segment} code: {code}")]
    UnknownCode { segment: &'static str, code: u32 },
}
