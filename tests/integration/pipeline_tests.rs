//! End-to-end pipeline tests: producers → channels → controller.
//!
//! Each test wires local channel instances into a [`ControlInputs`] view and
//! drives the controller with `next_input` + `dispatch`, the same two steps
//! its task loop performs.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use futures_lite::future::block_on;

use crate::mock_hw::{MockDisplay, MockHardware, RecordingSink};

use roomguard::app::commands::ControlCommand;
use roomguard::app::service::{ControlInput, ControlService};
use roomguard::channels::{
    ButtonMailbox, CommandMailbox, ControlInputs, LatestReading, RemoteWrite, submit_remote_write,
};
use roomguard::config::SystemConfig;
use roomguard::control::Actuator;
use roomguard::drivers::button::{ButtonEdge, EmergencyMonitor};
use roomguard::sensors::SensorReading;
use roomguard::sensors::dht11::Dht11;
use roomguard::sensors::sampler::SensorSampler;
use roomguard::sensors::sim::{SimClock, SimLine, SimTimer, Waveform};

struct Channels {
    readings: LatestReading,
    buttons: ButtonMailbox,
    commands: CommandMailbox,
}

impl Channels {
    fn new() -> Self {
        Self {
            readings: LatestReading::new(),
            buttons: ButtonMailbox::new(),
            commands: CommandMailbox::new(),
        }
    }

    fn inputs(&self) -> ControlInputs<'_> {
        ControlInputs {
            readings: &self.readings,
            buttons: &self.buttons,
            commands: &self.commands,
        }
    }
}

/// Button wired active-low; `pressed` is what the test flips.
struct Button {
    pressed: bool,
}

impl ErrorType for Button {
    type Error = Infallible;
}

impl InputPin for Button {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed)
    }
}

fn service() -> ControlService {
    ControlService::new(&SystemConfig::default()).unwrap()
}

/// One iteration of the controller task.
fn step(
    svc: &mut ControlService,
    ch: &Channels,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    display: &mut MockDisplay,
) -> ControlInput {
    let input = block_on(ControlService::next_input(ch.inputs()));
    svc.dispatch(input, hw, sink, display);
    input
}

#[test]
fn decoded_frame_drives_ac_on() {
    let ch = Channels::new();
    let clock = SimClock::default();
    let dht = Dht11::new(
        SimLine::new(clock.clone(), Waveform::frame([60, 0, 28, 0, 88])),
        SimTimer::new(clock),
    );
    let mut sampler = SensorSampler::new(dht, 3);
    let (mut svc, mut hw, mut sink, mut display) = (
        service(),
        MockHardware::new(),
        RecordingSink::new(),
        MockDisplay::new(),
    );

    sampler.sample_and_publish(&ch.readings, &mut sink);
    let input = step(&mut svc, &ch, &mut hw, &mut sink, &mut display);

    assert!(matches!(input, ControlInput::Reading(r) if r.temperature == 28.0));
    assert!(hw.is_on(Actuator::AirConditioner));
    assert_eq!(display.last(), Some(("T:28.0C H:60%", "A1 W0 S0 F0 L0")));
}

#[test]
fn controller_sees_only_newest_reading() {
    let ch = Channels::new();
    let (mut svc, mut hw, mut sink, mut display) = (
        service(),
        MockHardware::new(),
        RecordingSink::new(),
        MockDisplay::new(),
    );

    ch.readings.signal(SensorReading::new(31.0, 40.0));
    ch.readings.signal(SensorReading::new(24.0, 40.0));
    step(&mut svc, &ch, &mut hw, &mut sink, &mut display);

    assert!(!svc.state().emergency, "stale alarm reading was superseded");
    assert_eq!(sink.floats_for("Temperature"), vec![24.0]);
    assert!(!ch.readings.signaled());
}

#[test]
fn button_press_reaches_controller_once() {
    let ch = Channels::new();
    let mut monitor = EmergencyMonitor::new(Button { pressed: false }, false);
    let (mut svc, mut hw, mut sink, mut display) = (
        service(),
        MockHardware::new(),
        RecordingSink::new(),
        MockDisplay::new(),
    );

    let forward = |monitor: &mut EmergencyMonitor<Button>| {
        if let Some(edge) = monitor.poll() {
            ch.buttons.try_send(edge).unwrap();
        }
    };

    forward(&mut monitor);
    monitor.pin_mut().pressed = true;
    for _ in 0..5 {
        forward(&mut monitor);
    }
    assert_eq!(ch.buttons.len(), 1, "held button is one edge");

    let input = step(&mut svc, &ch, &mut hw, &mut sink, &mut display);
    assert_eq!(input, ControlInput::Button(ButtonEdge));
    assert!(svc.state().emergency);
    assert!(hw.is_on(Actuator::FireWater));
    assert_eq!(sink.alerts, vec!["EMERGENCY ACTIVATED!"]);
}

#[test]
fn remote_write_reaches_controller() {
    let ch = Channels::new();
    let (mut svc, mut hw, mut sink, mut display) = (
        service(),
        MockHardware::new(),
        RecordingSink::new(),
        MockDisplay::new(),
    );

    assert_eq!(
        submit_remote_write(&ch.commands, "Extractor Fan", "Power", true),
        RemoteWrite::Queued(ControlCommand::SetActuator(Actuator::ExtractorFan, true))
    );
    assert_eq!(
        submit_remote_write(&ch.commands, "Toaster", "Power", true),
        RemoteWrite::Unknown
    );

    step(&mut svc, &ch, &mut hw, &mut sink, &mut display);
    assert!(hw.is_on(Actuator::ExtractorFan));
    assert_eq!(sink.bools_for("Extractor Fan"), vec![true]);
    assert!(ch.commands.is_empty());
}

#[test]
fn remote_emergency_switch_round_trips() {
    let ch = Channels::new();
    let (mut svc, mut hw, mut sink, mut display) = (
        service(),
        MockHardware::new(),
        RecordingSink::new(),
        MockDisplay::new(),
    );

    submit_remote_write(&ch.commands, "Emergency", "Power", true);
    step(&mut svc, &ch, &mut hw, &mut sink, &mut display);
    submit_remote_write(&ch.commands, "Emergency", "Power", false);
    step(&mut svc, &ch, &mut hw, &mut sink, &mut display);

    assert_eq!(sink.bools_for("Emergency"), vec![true, false]);
    assert_eq!(
        sink.alerts,
        vec!["EMERGENCY ACTIVATED!", "Emergency Deactivated"]
    );
}

#[test]
fn operator_inputs_take_priority_over_readings() {
    let ch = Channels::new();
    let (mut svc, mut hw, mut sink, mut display) = (
        service(),
        MockHardware::new(),
        RecordingSink::new(),
        MockDisplay::new(),
    );

    ch.readings.signal(SensorReading::new(25.0, 50.0));
    ch.commands
        .try_send(ControlCommand::SetActuator(Actuator::FireLed, true))
        .unwrap();
    ch.buttons.try_send(ButtonEdge).unwrap();

    let order: Vec<_> = (0..3)
        .map(|_| step(&mut svc, &ch, &mut hw, &mut sink, &mut display))
        .collect();
    assert!(matches!(order[0], ControlInput::Button(_)));
    assert!(matches!(order[1], ControlInput::Command(_)));
    assert!(matches!(order[2], ControlInput::Reading(_)));
}
