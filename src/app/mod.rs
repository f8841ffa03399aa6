//! Application core: pure domain orchestration, zero I/O.
//!
//! Business rules for the RoomGuard controller: command routing, alert
//! texts, and the [`service::ControlService`] that applies engine
//! transitions. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
