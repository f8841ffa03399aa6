//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the relay bank and exposes it through [`ActuatorPort`]. The DHT11
//! decoder is built over the raw data line here too, so `main` never touches
//! pin numbers directly. On non-espidf targets the underlying GPIO helpers
//! are simulation stubs.

use crate::app::ports::ActuatorPort;
use crate::config::PinAssignment;
use crate::control::Actuator;
use crate::drivers::hw_init::{GpioInput, GpioLine, RomTimer};
use crate::drivers::relay::RelayBank;
use crate::sensors::dht11::Dht11;

/// The DHT11 on the board's data pin.
pub type BoardSensor = Dht11<GpioLine, RomTimer>;

pub fn board_sensor(pins: &PinAssignment) -> BoardSensor {
    Dht11::new(GpioLine::new(pins.dht_data), RomTimer::new())
}

pub fn board_button(pins: &PinAssignment) -> GpioInput {
    GpioInput::new(pins.emergency_button)
}

/// Concrete adapter that puts the relay outputs behind [`ActuatorPort`].
pub struct HardwareAdapter {
    relays: RelayBank,
}

impl HardwareAdapter {
    pub fn new(relays: RelayBank) -> Self {
        Self { relays }
    }

    pub fn relays(&self) -> &RelayBank {
        &self.relays
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set(&mut self, actuator: Actuator, on: bool) {
        self.relays.set(actuator, on);
    }
}
