//! Local actuator panel simulation.
//!
//! The client mirrors every reply on a small panel: one humidifier,
//! one status LED, one buzzer. [`Panel::apply`] diffs the new code
//! against the current state and returns the transitions to announce,
//! so repeated identical replies stay quiet. The LED rule is
//! symmetric: the indicated color turns on and the previous one turns
//! off. The buzzer is transient and alerts on every reply that carries
//! it.

use crossterm::style::Stylize;

use hygro_core::{ActuationCode, BuzzerState, HumidifierState, LedColor};

/// Panel state carried between replies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    humidifier_on: bool,
    led: Option<LedColor>,
}

/// One observable panel change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    HumidifierOn,
    HumidifierOff,
    LedOff(LedColor),
    LedOn(LedColor),
    BuzzerAlert,
}

impl Panel {
    /// Creates a panel with everything off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a reply, returning the transitions it caused, in order:
    /// humidifier first, then LED changes, then the buzzer.
    pub fn apply(&mut self, code: &ActuationCode) -> Vec<Transition> {
        let mut transitions = Vec::new();

        match (self.humidifier_on, code.humidifier) {
            (false, HumidifierState::On) => {
                self.humidifier_on = true;
                transitions.push(Transition::HumidifierOn);
            }
            (true, HumidifierState::Off) => {
                self.humidifier_on = false;
                transitions.push(Transition::HumidifierOff);
            }
            _ => {}
        }

        if self.led != Some(code.led) {
            if let Some(previous) = self.led {
                transitions.push(Transition::LedOff(previous));
            }
            self.led = Some(code.led);
            transitions.push(Transition::LedOn(code.led));
        }

        if code.buzzer == BuzzerState::On {
            transitions.push(Transition::BuzzerAlert);
        }

        transitions
    }

    /// Current LED color, if any is lit.
    pub fn led(&self) -> Option<LedColor> {
        self.led
    }

    /// Whether the humidifier is currently running.
    pub fn humidifier_on(&self) -> bool {
        self.humidifier_on
    }
}

impl Transition {
    /// Plain message text for this transition.
    pub fn message(&self) -> String {
        match self {
            Self::HumidifierOn => "humidity low - humidifier on".to_string(),
            Self::HumidifierOff => "humidifier off".to_string(),
            Self::LedOn(color) => format!("{} LED on", color.name()),
            Self::LedOff(color) => format!("{} LED off", color.name()),
            Self::BuzzerAlert => "humidity high - ventilate (buzzer)".to_string(),
        }
    }

    /// Message styled for the terminal; LED lines take their color.
    pub fn styled(&self) -> String {
        let message = self.message();
        match self {
            Self::LedOn(LedColor::Red) => message.red().to_string(),
            Self::LedOn(LedColor::Green) => message.green().to_string(),
            Self::LedOn(LedColor::Blue) => message.blue().to_string(),
            Self::LedOff(_) => message.dark_grey().to_string(),
            Self::HumidifierOn | Self::HumidifierOff => message.cyan().to_string(),
            Self::BuzzerAlert => message.yellow().bold().to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
