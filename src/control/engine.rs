//! Control engine: the single owner of [`ControlState`].
//!
//! Every input goes through one of three transition functions, each
//! returning a [`Transition`] that the service turns into side effects:
//!
//! ```text
//!  SensorReading ──▶ on_reading()     ─┐
//!  ButtonEdge    ──▶ on_button_edge() ─┼──▶ Transition { before, after, emergency }
//!  ControlCommand──▶ on_command()     ─┘
//! ```
//!
//! Per reading the AC band is evaluated first, then the emergency machine.
//! Entering an emergency forces AC off, so a reading that crosses both
//! `ac_on` and `alarm_on` ends with AC off.

use log::{info, warn};

use crate::app::commands::ControlCommand;
use crate::config::Thresholds;
use crate::sensors::SensorReading;

use super::emergency::{EmergencyChange, EmergencyFsm, EmergencyInput, EmergencyMode};
use super::hysteresis::{Hysteresis, Zone};
use super::{Actuator, ControlState};

/// Result of feeding one input to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub before: ControlState,
    pub after: ControlState,
    pub emergency: Option<EmergencyChange>,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

pub struct ControlEngine {
    state: ControlState,
    ac_band: Hysteresis,
    emergency: EmergencyFsm,
    /// Cleared by a manual AC write; set again on the next band crossing.
    ac_auto: bool,
    last_ac_zone: Option<Zone>,
}

impl ControlEngine {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            state: ControlState::default(),
            ac_band: Hysteresis::new(thresholds.ac_on_c, thresholds.ac_off_c),
            emergency: EmergencyFsm::new(Hysteresis::new(
                thresholds.alarm_on_c,
                thresholds.alarm_off_c,
            )),
            ac_auto: true,
            last_ac_zone: None,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn mode(&self) -> EmergencyMode {
        self.emergency.mode()
    }

    /// Whether the AC is under hysteresis control (no manual override pending).
    pub fn ac_auto(&self) -> bool {
        self.ac_auto
    }

    // ── Transitions ───────────────────────────────────────────

    /// Apply one reading. Invalid readings change nothing.
    pub fn on_reading(&mut self, reading: &SensorReading) -> Transition {
        let before = self.state;
        if !reading.valid {
            return self.finish(before, None);
        }
        let t = reading.temperature;

        // Only a move between zones is a crossing; the first reading is not.
        let zone = self.ac_band.zone(t);
        let crossed = matches!(self.last_ac_zone, Some(prev) if prev != zone);
        if zone != Zone::Deadband && crossed {
            if !self.ac_auto {
                info!("CONTROL | AC override released at {:.1}\u{00b0}C", t);
            }
            self.ac_auto = true;
        }
        self.last_ac_zone = Some(zone);

        if self.ac_auto && !self.emergency.is_active() {
            self.state.ac = self.ac_band.next(self.state.ac, t);
        }

        let change = self.emergency.step(EmergencyInput::Temperature(t));
        self.apply_emergency(change);
        self.finish(before, change)
    }

    /// A debounced press of the emergency button always toggles.
    pub fn on_button_edge(&mut self) -> Transition {
        let before = self.state;
        let change = self.emergency.step(EmergencyInput::ButtonEdge);
        self.apply_emergency(change);
        self.finish(before, change)
    }

    pub fn on_command(&mut self, cmd: ControlCommand) -> Transition {
        let before = self.state;
        match cmd {
            ControlCommand::SetActuator(Actuator::AirConditioner, on) => {
                if self.emergency.is_active() {
                    warn!("CONTROL | AC write rejected during emergency");
                } else {
                    self.state.ac = on;
                    self.ac_auto = false;
                }
                self.finish(before, None)
            }
            ControlCommand::SetActuator(actuator, on) => {
                self.state.set(actuator, on);
                self.finish(before, None)
            }
            ControlCommand::Emergency(active) => {
                let input = if active {
                    EmergencyInput::Activate
                } else {
                    EmergencyInput::Deactivate
                };
                let change = self.emergency.step(input);
                self.apply_emergency(change);
                self.finish(before, change)
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_emergency(&mut self, change: Option<EmergencyChange>) {
        match change {
            Some(EmergencyChange::Entered(_)) => {
                self.state.water = true;
                self.state.sound = true;
                self.state.fire_led = true;
                self.state.fan = true;
                self.state.ac = false;
                self.state.emergency = true;
                self.ac_auto = true;
            }
            Some(EmergencyChange::Exited) => {
                self.state.water = false;
                self.state.sound = false;
                self.state.fire_led = false;
                self.state.fan = false;
                self.state.emergency = false;
            }
            None => {}
        }
    }

    fn finish(&self, before: ControlState, emergency: Option<EmergencyChange>) -> Transition {
        let t = Transition {
            before,
            after: self.state,
            emergency,
        };
        if t.changed() {
            info!("CONTROL | {:?} -> {:?}", t.before, t.after);
        }
        t
    }
}
