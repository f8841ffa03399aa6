//! Sensor subsystem: the DHT11 decoder and the periodic [`sampler`].
//!
//! Only validated frames become a [`SensorReading`]; decode failures stay
//! inside the sampler and never reach the controller.

pub mod dht11;
pub mod sampler;
#[cfg(not(target_os = "espidf"))]
pub mod sim;

use std::time::Instant;

use dht11::SensorFrame;

/// A typed, timestamped reading. Each one supersedes the previous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// °C
    pub temperature: f32,
    /// % relative humidity
    pub humidity: f32,
    /// `false` readings are ignored by the controller.
    pub valid: bool,
    pub sampled_at: Instant,
}

impl SensorReading {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
            valid: true,
            sampled_at: Instant::now(),
        }
    }

    pub fn from_frame(frame: &SensorFrame) -> Self {
        Self::new(frame.temperature(), frame.humidity())
    }
}
