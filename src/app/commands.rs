//! Inbound commands to the control service.
//!
//! These represent actions requested by the outside world (cloud parameter
//! writes today) that the [`ControlService`](super::service::ControlService)
//! hands to the engine.

use crate::control::Actuator;

/// Device name reserved for the emergency switch.
pub const EMERGENCY_DEVICE: &str = "Emergency";
/// The only writable parameter on every device.
pub const POWER_PARAM: &str = "Power";

/// Commands that external adapters can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Switch one actuator. AC writes are refused while an emergency is active.
    SetActuator(Actuator, bool),
    /// `true` activates a manual emergency, `false` clears any emergency.
    Emergency(bool),
}

impl ControlCommand {
    /// Map a cloud `(device, param, value)` write to a command.
    pub fn from_remote_write(device: &str, param: &str, value: bool) -> Option<Self> {
        if param != POWER_PARAM {
            return None;
        }
        if device == EMERGENCY_DEVICE {
            return Some(Self::Emergency(value));
        }
        Actuator::from_device_name(device).map(|a| Self::SetActuator(a, value))
    }
}
