//! Integration tests for the ControlService → engine → ports pipeline.
//!
//! Every input goes through `dispatch`, exactly as the controller task
//! would deliver it, and assertions are made on the recorded outputs.

use crate::mock_hw::{CloudReport, MockDisplay, MockHardware, RecordingSink};

use roomguard::app::commands::ControlCommand;
use roomguard::app::service::{ControlInput, ControlService};
use roomguard::config::SystemConfig;
use roomguard::control::Actuator;
use roomguard::control::emergency::{EmergencyChange, EmergencyMode, EmergencyTrigger};
use roomguard::drivers::button::ButtonEdge;
use roomguard::sensors::SensorReading;

struct Rig {
    svc: ControlService,
    hw: MockHardware,
    sink: RecordingSink,
    display: MockDisplay,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            svc: ControlService::new(&SystemConfig::default()).unwrap(),
            hw: MockHardware::new(),
            sink: RecordingSink::new(),
            display: MockDisplay::new(),
        };
        rig.svc.start(&mut rig.hw, &mut rig.display);
        rig
    }

    fn send(&mut self, input: ControlInput) -> roomguard::control::engine::Transition {
        self.svc
            .dispatch(input, &mut self.hw, &mut self.sink, &mut self.display)
    }

    fn temp(&mut self, t: f32) -> roomguard::control::engine::Transition {
        self.send(ControlInput::Reading(SensorReading::new(t, 55.0)))
    }

    fn press(&mut self) -> roomguard::control::engine::Transition {
        self.send(ControlInput::Button(ButtonEdge))
    }

    fn command(&mut self, cmd: ControlCommand) -> roomguard::control::engine::Transition {
        self.send(ControlInput::Command(cmd))
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_drives_everything_off_and_draws() {
    let rig = Rig::new();
    assert_eq!(rig.hw.calls.len(), Actuator::ALL.len());
    assert!(rig.hw.calls.iter().all(|(_, on)| !on));
    assert_eq!(rig.display.last(), Some(("T:--.-C H:--%", "A0 W0 S0 F0 L0")));
}

// ── Hysteresis ────────────────────────────────────────────────

#[test]
fn monotonic_rise_turns_ac_on_exactly_once() {
    let mut rig = Rig::new();
    for t in [25.0, 25.8, 26.4, 26.9, 27.0, 27.3, 27.9, 28.5] {
        rig.temp(t);
    }
    assert_eq!(rig.sink.bools_for("Air Conditioner"), vec![true]);
    assert!(rig.hw.is_on(Actuator::AirConditioner));

    // Falling but never reaching ac_off.
    for t in [27.5, 26.8, 26.1, 26.6] {
        rig.temp(t);
    }
    assert_eq!(rig.sink.bools_for("Air Conditioner"), vec![true]);
    assert!(rig.svc.state().ac);

    rig.temp(26.0);
    assert_eq!(rig.sink.bools_for("Air Conditioner"), vec![true, false]);
    assert!(!rig.hw.is_on(Actuator::AirConditioner));
}

#[test]
fn readings_are_reported_as_telemetry() {
    let mut rig = Rig::new();
    rig.send(ControlInput::Reading(SensorReading::new(24.5, 61.0)));
    assert_eq!(rig.sink.floats_for("Temperature"), vec![24.5]);
    assert_eq!(rig.sink.floats_for("Humidity"), vec![61.0]);
    assert_eq!(rig.display.last(), Some(("T:24.5C H:61%", "A0 W0 S0 F0 L0")));
    assert_eq!(rig.svc.latest_reading().unwrap().temperature, 24.5);
}

#[test]
fn invalid_reading_changes_nothing() {
    let mut rig = Rig::new();
    let calls = rig.hw.calls.len();
    let t = rig.send(ControlInput::Reading(SensorReading {
        valid: false,
        ..SensorReading::new(40.0, 0.0)
    }));
    assert!(!t.changed());
    assert_eq!(rig.hw.calls.len(), calls);
    assert!(rig.sink.reports.is_empty());
    assert!(rig.svc.latest_reading().is_none());
}

// ── Emergency ─────────────────────────────────────────────────

#[test]
fn alarm_reading_wins_over_ac_crossing() {
    let mut rig = Rig::new();
    rig.temp(25.0);
    let t = rig.temp(30.0);
    assert_eq!(
        t.emergency,
        Some(EmergencyChange::Entered(EmergencyTrigger::AutoThreshold))
    );
    assert!(!rig.hw.is_on(Actuator::AirConditioner));
    for a in [
        Actuator::FireWater,
        Actuator::SoundAlarm,
        Actuator::FireLed,
        Actuator::ExtractorFan,
    ] {
        assert!(rig.hw.is_on(a), "{:?} should be on", a);
    }
    assert_eq!(rig.sink.alerts, vec!["EMERGENCY ACTIVATED!"]);
    assert_eq!(rig.sink.bools_for("Emergency"), vec![true]);
    assert!(rig.sink.bools_for("Air Conditioner").is_empty());
    assert_eq!(rig.display.last(), Some(("T:30.0C H:55%", "!! EMERGENCY !!")));
}

#[test]
fn auto_emergency_clears_below_alarm_off() {
    let mut rig = Rig::new();
    rig.temp(31.0);
    rig.temp(29.5);
    assert_eq!(rig.svc.engine().mode(), EmergencyMode::Active(EmergencyTrigger::AutoThreshold));
    rig.temp(29.0);
    assert_eq!(rig.svc.engine().mode(), EmergencyMode::Normal);
    assert_eq!(
        rig.sink.alerts,
        vec!["EMERGENCY ACTIVATED!", "Emergency Deactivated"]
    );
    assert!(!rig.hw.is_on(Actuator::FireWater));
    assert!(!rig.hw.is_on(Actuator::AirConditioner), "AC waits for the next reading");

    rig.temp(29.0);
    assert!(rig.hw.is_on(Actuator::AirConditioner));
}

#[test]
fn manual_deactivation_overrides_auto_trigger() {
    let mut rig = Rig::new();
    rig.temp(32.0);
    let t = rig.command(ControlCommand::Emergency(false));
    assert_eq!(t.emergency, Some(EmergencyChange::Exited));
    assert!(!rig.svc.state().emergency);
    assert_eq!(rig.sink.alerts.last().map(String::as_str), Some("Emergency Deactivated"));
    assert_eq!(rig.sink.bools_for("Emergency"), vec![true, false]);
}

#[test]
fn two_button_edges_activate_then_deactivate() {
    let mut rig = Rig::new();
    let first = rig.press();
    assert_eq!(
        first.emergency,
        Some(EmergencyChange::Entered(EmergencyTrigger::Manual))
    );
    let second = rig.press();
    assert_eq!(second.emergency, Some(EmergencyChange::Exited));
    assert_eq!(
        rig.sink.alerts,
        vec!["EMERGENCY ACTIVATED!", "Emergency Deactivated"]
    );
    assert_eq!(rig.display.last().map(|l| l.1), Some("A0 W0 S0 F0 L0"));
}

#[test]
fn manual_emergency_survives_cool_readings() {
    let mut rig = Rig::new();
    rig.command(ControlCommand::Emergency(true));
    for t in [22.0, 20.0, 18.5] {
        rig.temp(t);
    }
    assert!(rig.svc.state().emergency);
    assert_eq!(rig.sink.alerts.len(), 1);
}

#[test]
fn activation_while_active_is_silent() {
    let mut rig = Rig::new();
    rig.temp(30.5);
    let t = rig.command(ControlCommand::Emergency(true));
    assert!(t.emergency.is_none());
    assert_eq!(rig.sink.alerts.len(), 1);
    assert_eq!(rig.svc.engine().mode(), EmergencyMode::Active(EmergencyTrigger::AutoThreshold));
}

// ── Remote commands ───────────────────────────────────────────

#[test]
fn refused_ac_write_is_reported_back() {
    let mut rig = Rig::new();
    rig.press();
    rig.sink.reports.clear();
    let t = rig.command(ControlCommand::SetActuator(Actuator::AirConditioner, true));
    assert!(!t.changed());
    assert_eq!(
        rig.sink.reports,
        vec![CloudReport::Bool("Air Conditioner".into(), "Power".into(), false)]
    );
}

#[test]
fn operator_can_silence_alarm_during_emergency() {
    let mut rig = Rig::new();
    rig.press();
    rig.command(ControlCommand::SetActuator(Actuator::SoundAlarm, false));
    assert!(!rig.hw.is_on(Actuator::SoundAlarm));
    assert!(rig.hw.is_on(Actuator::FireWater));
    assert!(rig.svc.state().emergency);
}

#[test]
fn manual_ac_holds_until_band_crossing() {
    let mut rig = Rig::new();
    rig.command(ControlCommand::SetActuator(Actuator::AirConditioner, true));
    assert!(rig.hw.is_on(Actuator::AirConditioner));
    rig.temp(26.5);
    assert!(rig.hw.is_on(Actuator::AirConditioner), "deadband leaves override alone");
    rig.temp(25.5);
    assert!(!rig.hw.is_on(Actuator::AirConditioner), "crossing ac_off hands AC back");
}

#[test]
fn boot_override_survives_first_cool_reading() {
    let mut rig = Rig::new();
    rig.command(ControlCommand::SetActuator(Actuator::AirConditioner, true));
    rig.temp(22.0);
    assert!(rig.hw.is_on(Actuator::AirConditioner));
    assert_eq!(rig.sink.bools_for("Air Conditioner"), vec![true]);
}

// ── Display contention ────────────────────────────────────────

#[test]
fn contended_display_does_not_block_control() {
    let mut rig = Rig::new();
    rig.display.contended = true;
    let frames = rig.display.frames.len();
    rig.temp(28.0);
    assert!(rig.hw.is_on(Actuator::AirConditioner));
    assert_eq!(rig.display.frames.len(), frames);

    rig.display.contended = false;
    rig.temp(28.0);
    assert_eq!(rig.display.last(), Some(("T:28.0C H:55%", "A1 W0 S0 F0 L0")));
}
