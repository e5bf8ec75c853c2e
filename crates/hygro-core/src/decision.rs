//! The decision policy: (temperature, humidity) → actuation code.
//!
//! Each temperature band has a single optimal-humidity breakpoint:
//!
//! | temperature | optimal humidity |
//! |-------------|------------------|
//! | below 18    | 70               |
//! | 18..=20     | 60               |
//! | 21..=23     | 50               |
//! | 24 and up   | 40               |
//!
//! Within a band: humidity below the breakpoint turns the humidifier on
//! with a red LED; exactly at the breakpoint everything is nominal
//! (green LED); above it the buzzer alerts with a blue LED so the room
//! gets ventilated. The outer bands are unbounded, so the policy is
//! total over all integer temperatures.

use crate::actuation::{ActuationCode, BuzzerState, HumidifierState, LedColor};

/// Returns the optimal humidity breakpoint for a temperature.
pub fn optimal_humidity(temperature: i32) -> i32 {
    match temperature {
        t if t < 18 => 70,
        18..=20 => 60,
        21..=23 => 50,
        _ => 40,
    }
}

/// Decides the actuation response for one sensor report.
///
/// Pure and total: no state, no I/O, defined for every integer pair.
/// The equality case is deliberate — only an exact match with the
/// band's breakpoint produces the nominal green response.
pub fn decide(temperature: i32, humidity: i32) -> ActuationCode {
    let optimal = optimal_humidity(temperature);

    if humidity < optimal {
        ActuationCode::new(HumidifierState::On, LedColor::Red, BuzzerState::Off)
    } else if humidity == optimal {
        ActuationCode::new(HumidifierState::Off, LedColor::Green, BuzzerState::Off)
    } else {
        ActuationCode::new(HumidifierState::Off, LedColor::Blue, BuzzerState::On)
    }
}
