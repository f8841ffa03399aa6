//! System configuration parameters
//!
//! All tunable parameters for the RoomGuard controller. Plain data handed to
//! the tasks at init; nothing here is mutated after startup.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;

/// Temperature set-points (°C) for the two hysteresis bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Cooling switches on at or above this temperature.
    pub ac_on_c: f32,
    /// Cooling switches off at or below this temperature.
    pub ac_off_c: f32,
    /// Automatic emergency entry at or above this temperature.
    pub alarm_on_c: f32,
    /// Automatic emergency exit at or below this temperature.
    pub alarm_off_c: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ac_on_c: 27.0,
            ac_off_c: 26.0,
            alarm_on_c: 30.0,
            alarm_off_c: 29.0,
        }
    }
}

/// GPIO numbers for every peripheral the controller touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    pub dht_data: i32,
    pub emergency_button: i32,
    pub ac_relay: i32,
    pub water_valve: i32,
    pub sound_alarm: i32,
    pub fire_led: i32,
    pub extractor_fan: i32,
    pub i2c_scl: i32,
    pub i2c_sda: i32,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            dht_data: pins::DHT_DATA_GPIO,
            emergency_button: pins::EMERGENCY_BUTTON_GPIO,
            ac_relay: pins::AC_RELAY_GPIO,
            water_valve: pins::WATER_VALVE_GPIO,
            sound_alarm: pins::SOUND_ALARM_GPIO,
            fire_led: pins::FIRE_LED_GPIO,
            extractor_fan: pins::EXTRACTOR_FAN_GPIO,
            i2c_scl: pins::I2C_SCL_GPIO,
            i2c_sda: pins::I2C_SDA_GPIO,
        }
    }
}

impl PinAssignment {
    fn all(&self) -> [i32; 9] {
        [
            self.dht_data,
            self.emergency_button,
            self.ac_relay,
            self.water_valve,
            self.sound_alarm,
            self.fire_led,
            self.extractor_fan,
            self.i2c_scl,
            self.i2c_sda,
        ]
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Control ---
    pub thresholds: Thresholds,

    // --- Timing ---
    /// Sensor read period (milliseconds). DHT11 needs at least 1 s between reads.
    pub sensor_read_interval_ms: u32,
    /// Emergency button poll period (milliseconds)
    pub button_poll_interval_ms: u32,
    /// Bounded wait for the display lock before a render is skipped (milliseconds)
    pub display_lock_timeout_ms: u32,

    // --- Input ---
    /// `false` = button pulls the line low when pressed.
    pub button_active_high: bool,

    // --- Diagnostics ---
    /// Consecutive decoder failures before an alert is raised. 0 disables.
    pub decoder_alert_after_failures: u32,

    pub pins: PinAssignment,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),

            sensor_read_interval_ms: 10_000,
            button_poll_interval_ms: 100,
            display_lock_timeout_ms: 100,

            button_active_high: false,

            decoder_alert_after_failures: 3,

            pins: PinAssignment::default(),
        }
    }
}

/// DHT11 datasheet minimum sampling period.
const MIN_SENSOR_INTERVAL_MS: u32 = 1_000;

impl SystemConfig {
    /// Reject configurations the controller cannot run safely with.
    ///
    /// Deadbands must be strictly positive or the hysteresis would chatter.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if ![t.ac_on_c, t.ac_off_c, t.alarm_on_c, t.alarm_off_c]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(Error::InvalidConfiguration("thresholds must be finite"));
        }
        if t.ac_off_c >= t.ac_on_c {
            return Err(Error::InvalidConfiguration("ac_off_c must be below ac_on_c"));
        }
        if t.alarm_off_c >= t.alarm_on_c {
            return Err(Error::InvalidConfiguration(
                "alarm_off_c must be below alarm_on_c",
            ));
        }
        if self.sensor_read_interval_ms < MIN_SENSOR_INTERVAL_MS {
            return Err(Error::InvalidConfiguration(
                "sensor_read_interval_ms below 1000",
            ));
        }
        if self.button_poll_interval_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "button_poll_interval_ms must be non-zero",
            ));
        }

        let pins = self.pins.all();
        for (i, pin) in pins.iter().enumerate() {
            if *pin < 0 {
                return Err(Error::InvalidConfiguration("negative GPIO number"));
            }
            if pins[i + 1..].contains(pin) {
                return Err(Error::InvalidConfiguration("GPIO assigned twice"));
            }
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|_| Error::InvalidConfiguration("malformed configuration JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
