//! Outbound alert texts and cloud parameter names.

use crate::control::emergency::{EmergencyChange, EmergencyTrigger};

pub const ALERT_EMERGENCY_ON: &str = "EMERGENCY ACTIVATED!";
pub const ALERT_EMERGENCY_OFF: &str = "Emergency Deactivated";

/// Telemetry device and its two parameters.
pub const SENSOR_DEVICE: &str = "Sensor";
pub const TEMPERATURE_PARAM: &str = "Temperature";
pub const HUMIDITY_PARAM: &str = "Humidity";

/// Alert text for an emergency mode change.
pub fn emergency_alert(change: EmergencyChange) -> &'static str {
    match change {
        EmergencyChange::Entered(_) => ALERT_EMERGENCY_ON,
        EmergencyChange::Exited => ALERT_EMERGENCY_OFF,
    }
}

pub fn trigger_label(trigger: EmergencyTrigger) -> &'static str {
    match trigger {
        EmergencyTrigger::Manual => "manual",
        EmergencyTrigger::AutoThreshold => "temperature",
    }
}
