//! Integration tests for the DHT11 decoder driven through the sampler.
//!
//! The simulated line replays a device waveform on a virtual clock, so
//! every test is a full start-signal → response → 40-bit transaction.

use crate::mock_hw::RecordingSink;

use roomguard::channels::LatestReading;
use roomguard::error::DecodeError;
use roomguard::sensors::dht11::Dht11;
use roomguard::sensors::sampler::SensorSampler;
use roomguard::sensors::sim::{SimClock, SimLine, SimTimer, Waveform};

type SimSampler = SensorSampler<Dht11<SimLine, SimTimer>>;

fn sampler(waveform: Waveform, alert_after: u32) -> SimSampler {
    let clock = SimClock::default();
    let dht = Dht11::new(SimLine::new(clock.clone(), waveform), SimTimer::new(clock));
    SensorSampler::new(dht, alert_after)
}

fn next(s: &mut SimSampler, waveform: Waveform) {
    s.sensor_mut().line_mut().set_waveform(waveform);
}

#[test]
fn datasheet_frame_becomes_reading() {
    let mut s = sampler(Waveform::frame([65, 0, 27, 3, 95]), 3);
    let mut sink = RecordingSink::new();
    let r = s.sample(&mut sink).unwrap();
    assert!(r.valid);
    assert!((r.temperature - 27.3).abs() < 1e-4);
    assert!((r.humidity - 65.0).abs() < 1e-4);
    assert_eq!(s.diagnostics().successes, 1);
}

#[test]
fn timeout_mid_frame_keeps_previous_reading() {
    let mut s = sampler(Waveform::frame([40, 0, 22, 0, 62]), 3);
    let mut sink = RecordingSink::new();
    let good = s.sample(&mut sink).unwrap();

    next(&mut s, Waveform::frame([41, 0, 23, 0, 64]).stuck_low_after_bits(12));
    assert_eq!(s.sample(&mut sink), Err(DecodeError::Timeout));
    assert_eq!(s.latest(), Some(good));
    assert_eq!(s.diagnostics().timeouts, 1);
}

#[test]
fn disconnected_sensor_reports_no_response() {
    let mut s = sampler(Waveform::silent(), 3);
    let mut sink = RecordingSink::new();
    assert_eq!(s.sample(&mut sink), Err(DecodeError::NoResponse));
    assert!(s.latest().is_none());
}

#[test]
fn corrupted_frame_is_never_published() {
    let out = LatestReading::new();
    let mut s = sampler(Waveform::frame([50, 0, 25, 0, 76]), 3);
    let mut sink = RecordingSink::new();
    s.sample_and_publish(&out, &mut sink);
    assert!(out.try_take().is_none());
    assert_eq!(s.diagnostics().checksum_errors, 1);
}

#[test]
fn failure_streak_raises_single_alert() {
    let mut s = sampler(Waveform::silent(), 3);
    let mut sink = RecordingSink::new();
    for _ in 0..5 {
        let _ = s.sample(&mut sink);
    }
    assert_eq!(
        sink.alerts,
        vec!["Sensor read failing: no response (3 in a row)"]
    );

    next(&mut s, Waveform::frame([50, 0, 25, 0, 75]));
    s.sample(&mut sink).unwrap();
    assert_eq!(s.diagnostics().streak, 0);

    next(&mut s, Waveform::silent());
    for _ in 0..3 {
        let _ = s.sample(&mut sink);
    }
    assert_eq!(sink.alerts.len(), 2, "streak re-arms after a good read");
}

#[test]
fn unconsumed_reading_is_overwritten() {
    let out = LatestReading::new();
    let mut s = sampler(Waveform::frame([40, 0, 20, 0, 60]), 3);
    let mut sink = RecordingSink::new();
    s.sample_and_publish(&out, &mut sink);
    next(&mut s, Waveform::frame([45, 0, 21, 5, 71]));
    s.sample_and_publish(&out, &mut sink);

    let r = out.try_take().unwrap();
    assert!((r.temperature - 21.5).abs() < 1e-4);
    assert!((r.humidity - 45.0).abs() < 1e-4);
    assert!(out.try_take().is_none());
}

#[test]
fn stretched_bit_is_decoded_as_one() {
    // Bit 7 of the humidity byte is a 0 at nominal timing; at 60 µs it reads as 1.
    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 85]).with_bit_high_us(7, 60), 3);
    let mut sink = RecordingSink::new();
    let r = s.sample(&mut sink).unwrap();
    assert!((r.humidity - 65.0).abs() < 1e-4);
}

#[test]
fn bit_threshold_boundary() {
    let mut sink = RecordingSink::new();

    // 40 µs is still a 0.
    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 84]).with_bit_high_us(7, 40), 0);
    assert!((s.sample(&mut sink).unwrap().humidity - 64.0).abs() < 1e-4);

    // Same 40 µs against a checksum expecting a 1 bit.
    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 85]).with_bit_high_us(7, 40), 0);
    assert_eq!(s.sample(&mut sink), Err(DecodeError::ChecksumError));

    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 85]).with_bit_high_us(7, 41), 0);
    assert!((s.sample(&mut sink).unwrap().humidity - 65.0).abs() < 1e-4);
}

#[test]
fn bit_high_phase_budget() {
    let mut sink = RecordingSink::new();

    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 85]).with_bit_high_us(7, 100), 0);
    assert!((s.sample(&mut sink).unwrap().humidity - 65.0).abs() < 1e-4);

    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 85]).with_bit_high_us(7, 101), 0);
    assert_eq!(s.sample(&mut sink), Err(DecodeError::Timeout));

    let mut s = sampler(Waveform::frame([64, 0, 20, 0, 84]).with_bit_high_us(39, 150), 0);
    assert_eq!(s.sample(&mut sink), Err(DecodeError::Timeout));
}

#[test]
fn every_transaction_restarts_the_line() {
    let mut s = sampler(Waveform::frame([40, 0, 20, 0, 60]), 3);
    let mut sink = RecordingSink::new();
    s.sample(&mut sink).unwrap();
    s.sample(&mut sink).unwrap();
    let line = s.sensor_mut().line_mut();
    assert_eq!(line.outputs_set(), 2);
    assert_eq!(line.inputs_set(), 2);
    assert_eq!(line.samples_outside_critical(), 0);
}
