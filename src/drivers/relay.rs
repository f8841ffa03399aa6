//! Relay bank driving the five controller outputs.
//!
//! Each actuator maps to one active-HIGH GPIO. Writes go straight to the
//! pin and are mirrored in memory so repeated identical commands are cheap
//! to log-filter and the state can be queried without a register read.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use log::debug;

use crate::config::PinAssignment;
use crate::control::Actuator;
use crate::drivers::hw_init;

pub struct RelayBank {
    pins: [i32; 5],
    state: [bool; 5],
}

const fn slot(actuator: Actuator) -> usize {
    match actuator {
        Actuator::AirConditioner => 0,
        Actuator::FireWater => 1,
        Actuator::SoundAlarm => 2,
        Actuator::FireLed => 3,
        Actuator::ExtractorFan => 4,
    }
}

impl RelayBank {
    pub fn new(pins: &PinAssignment) -> Self {
        Self {
            pins: [
                pins.ac_relay,
                pins.water_valve,
                pins.sound_alarm,
                pins.fire_led,
                pins.extractor_fan,
            ],
            state: [false; 5],
        }
    }

    pub fn set(&mut self, actuator: Actuator, on: bool) {
        let i = slot(actuator);
        hw_init::gpio_write(self.pins[i], on);
        if self.state[i] != on {
            debug!("RELAY | {} -> {}", actuator.device_name(), if on { "ON" } else { "OFF" });
        }
        self.state[i] = on;
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.state[slot(actuator)]
    }

    pub fn pin(&self, actuator: Actuator) -> i32 {
        self.pins[slot(actuator)]
    }
}
