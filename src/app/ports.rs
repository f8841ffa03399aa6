//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (sensor line, relays, alert/cloud/display outputs)
//! implement these traits. The [`ControlService`](super::service::ControlService)
//! and [`SensorSampler`](crate::sensors::sampler::SensorSampler) consume
//! them via generics, so the domain core never touches hardware directly.

use crate::control::Actuator;
use crate::display::StatusLines;
use crate::error::{DecodeError, Result};
use crate::sensors::dht11::SensorFrame;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one complete sensor transaction per call.
pub trait SensorPort {
    fn read_frame(&mut self) -> core::result::Result<SensorFrame, DecodeError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: named boolean outputs. Calls are idempotent.
pub trait ActuatorPort {
    fn set(&mut self, actuator: Actuator, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Outbound notification ports
// ───────────────────────────────────────────────────────────────

/// Human-readable alerts (push notification, buzzer banner, ...).
pub trait AlertSink {
    fn raise_alert(&mut self, message: &str);
}

/// Cloud parameter synchronisation.
///
/// `device` is the user-facing device name ("Air Conditioner", "Sensor", ...)
/// and `param` the parameter on it ("Power", "Temperature", ...).
pub trait CloudSink {
    fn report_bool(&mut self, device: &str, param: &str, value: bool);
    fn report_float(&mut self, device: &str, param: &str, value: f32);
}

/// Two-line status display. May fail with
/// [`Error::ResourceContended`](crate::error::Error::ResourceContended),
/// in which case the caller skips this render.
pub trait DisplaySink {
    fn render(&mut self, lines: &StatusLines) -> Result<()>;
}
