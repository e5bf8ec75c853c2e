//! Random sensor sampling.
//!
//! The simulated sensor draws temperature from 10..=30 degrees and
//! relative humidity from 0..=99 percent, uniformly.

use rand::Rng;

/// One simulated reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSample {
    pub temperature: i32,
    pub humidity: i32,
}

/// Draws one reading from the simulated sensor.
///
/// Uses the thread-local RNG, taken fresh per call so no RNG handle is
/// ever held across an await.
pub fn sample() -> SensorSample {
    let mut rng = rand::thread_rng();
    SensorSample {
        temperature: rng.gen_range(10..=30),
        humidity: rng.gen_range(0..100),
    }
}
