//! Actuation states returned to clients after every report.
//!
//! The server answers each sensor report with an [`ActuationCode`]: one
//! humidifier state, one status-LED color, one buzzer state. All
//! actuation is advisory text on the wire; nothing here touches
//! hardware.

use std::fmt;

// ============================================================================
// Actuation States
// ============================================================================

/// Humidifier control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumidifierState {
    /// Humidifier off (code 0)
    Off,
    /// Humidifier on (code 1)
    On,
}

impl HumidifierState {
    /// Parses a humidifier state from its wire code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }

    /// Returns the wire code for this state.
    pub fn code(&self) -> u32 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl fmt::Display for HumidifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}

/// Status-LED color.
///
/// The LED mirrors how far humidity sits from the optimum for the
/// current temperature: red below, green at, blue above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    /// Humidity below optimum (code 0)
    Red,
    /// Humidity at optimum (code 1)
    Green,
    /// Humidity above optimum (code 2)
    Blue,
}

impl LedColor {
    /// Parses an LED color from its wire code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Red),
            1 => Some(Self::Green),
            2 => Some(Self::Blue),
            _ => None,
        }
    }

    /// Returns the wire code for this color.
    pub fn code(&self) -> u32 {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    /// Returns the color name in upper case, as printed on the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
        }
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Buzzer control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerState {
    /// Buzzer silent (code 0)
    Off,
    /// Buzzer alerting (code 1)
    On,
}

impl BuzzerState {
    /// Parses a buzzer state from its wire code, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }

    /// Returns the wire code for this state.
    pub fn code(&self) -> u32 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl fmt::Display for BuzzerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}

// ============================================================================
// Actuation Code
// ============================================================================

/// The complete control response for one sensor report.
///
/// Serialized on the wire as `<humidifier>.<led>.<buzzer>` with the
/// numeric codes above (e.g. `0.2.1`). Derived purely from a single
/// `(temperature, humidity)` pair; carries no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationCode {
    pub humidifier: HumidifierState,
    pub led: LedColor,
    pub buzzer: BuzzerState,
}

impl ActuationCode {
    /// Creates an actuation code from its three states.
    pub fn new(humidifier: HumidifierState, led: LedColor, buzzer: BuzzerState) -> Self {
        Self {
            humidifier,
            led,
            buzzer,
        }
    }
}

impl fmt::Display for ActuationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.humidifier.code(),
            self.led.code(),
            self.buzzer.code()
        )
    }
}
