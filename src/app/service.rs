//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the [`ControlEngine`] and the last accepted
//! reading. It waits on the three input channels, feeds the engine, and
//! fans each transition out through the port traits, making the whole
//! pipeline testable with mock adapters.
//!
//! ```text
//!  LatestReading ──┐                         ┌──▶ ActuatorPort
//!  ButtonMailbox ──┼──▶ ┌────────────────┐ ──┼──▶ AlertSink
//!  CommandMailbox ─┘    │ ControlService │   ├──▶ CloudSink
//!                       │ ControlEngine  │   └──▶ DisplaySink
//!                       └────────────────┘
//! ```

use futures_lite::future;
use log::{info, warn};

use crate::channels::ControlInputs;
use crate::config::SystemConfig;
use crate::control::engine::{ControlEngine, Transition};
use crate::control::emergency::EmergencyChange;
use crate::control::{Actuator, ControlState};
use crate::display::StatusLines;
use crate::drivers::button::ButtonEdge;
use crate::error::{Error, Result};
use crate::sensors::SensorReading;

use super::commands::{ControlCommand, EMERGENCY_DEVICE, POWER_PARAM};
use super::events::{
    emergency_alert, trigger_label, HUMIDITY_PARAM, SENSOR_DEVICE, TEMPERATURE_PARAM,
};
use super::ports::{ActuatorPort, AlertSink, CloudSink, DisplaySink};

/// Anything the controller can wake up for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    Reading(SensorReading),
    Button(ButtonEdge),
    Command(ControlCommand),
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    engine: ControlEngine,
    latest: Option<SensorReading>,
}

impl ControlService {
    /// Construct the service. Fails on an unusable configuration.
    pub fn new(config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: ControlEngine::new(&config.thresholds),
            latest: None,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to the initial (all off) state and draw the first frame.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, display: &mut impl DisplaySink) {
        let state = self.engine.state();
        apply_all(&state, hw);
        self.render(display);
        info!("ControlService started in {:?}", self.engine.mode());
    }

    /// Task body: wait for inputs and dispatch them, forever.
    pub async fn run(
        &mut self,
        inputs: ControlInputs<'_>,
        hw: &mut impl ActuatorPort,
        sink: &mut (impl AlertSink + CloudSink),
        display: &mut impl DisplaySink,
    ) {
        loop {
            let input = Self::next_input(inputs).await;
            self.dispatch(input, hw, sink, display);
        }
    }

    /// Wait for the next input. Operator inputs win over a pending reading.
    pub async fn next_input(inputs: ControlInputs<'_>) -> ControlInput {
        future::or(
            async { ControlInput::Button(inputs.buttons.receive().await) },
            future::or(
                async { ControlInput::Command(inputs.commands.receive().await) },
                async { ControlInput::Reading(inputs.readings.wait().await) },
            ),
        )
        .await
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Feed one input to the engine and apply every side effect.
    pub fn dispatch(
        &mut self,
        input: ControlInput,
        hw: &mut impl ActuatorPort,
        sink: &mut (impl AlertSink + CloudSink),
        display: &mut impl DisplaySink,
    ) -> Transition {
        let transition = match input {
            ControlInput::Reading(reading) => {
                let t = self.engine.on_reading(&reading);
                if reading.valid {
                    self.latest = Some(reading);
                    sink.report_float(SENSOR_DEVICE, TEMPERATURE_PARAM, reading.temperature);
                    sink.report_float(SENSOR_DEVICE, HUMIDITY_PARAM, reading.humidity);
                }
                t
            }
            ControlInput::Button(ButtonEdge) => self.engine.on_button_edge(),
            ControlInput::Command(cmd) => {
                let t = self.engine.on_command(cmd);
                if let ControlCommand::SetActuator(actuator, wanted) = cmd {
                    let actual = t.after.get(actuator);
                    if actual != wanted {
                        // Refused write: put the cloud switch back.
                        sink.report_bool(actuator.device_name(), POWER_PARAM, actual);
                    }
                }
                t
            }
        };

        self.publish(&transition, hw, sink);
        self.render(display);
        transition
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ControlState {
        self.engine.state()
    }

    pub fn engine(&self) -> &ControlEngine {
        &self.engine
    }

    pub fn latest_reading(&self) -> Option<SensorReading> {
        self.latest
    }

    pub fn status_lines(&self) -> StatusLines {
        StatusLines::compose(self.latest.as_ref(), &self.engine.state())
    }

    // ── Internal ──────────────────────────────────────────────

    fn publish(
        &self,
        t: &Transition,
        hw: &mut impl ActuatorPort,
        sink: &mut (impl AlertSink + CloudSink),
    ) {
        if t.changed() {
            apply_all(&t.after, hw);
        }

        for (actuator, on) in t.before.changed_actuators(t.after) {
            sink.report_bool(actuator.device_name(), POWER_PARAM, on);
        }
        if t.before.emergency != t.after.emergency {
            sink.report_bool(EMERGENCY_DEVICE, POWER_PARAM, t.after.emergency);
        }

        if let Some(change) = t.emergency {
            match change {
                EmergencyChange::Entered(trigger) => {
                    warn!("ALERT | emergency entered ({})", trigger_label(trigger));
                }
                EmergencyChange::Exited => info!("ALERT | emergency cleared"),
            }
            sink.raise_alert(emergency_alert(change));
        }
    }

    fn render(&self, display: &mut impl DisplaySink) {
        match display.render(&self.status_lines()) {
            Ok(()) => {}
            Err(Error::ResourceContended) => warn!("DISPLAY | busy, render skipped"),
            Err(e) => warn!("DISPLAY | render failed: {}", e),
        }
    }
}

/// Full-state write; actuator ports are idempotent.
fn apply_all(state: &ControlState, hw: &mut impl ActuatorPort) {
    for actuator in Actuator::ALL {
        hw.set(actuator, state.get(actuator));
    }
}
