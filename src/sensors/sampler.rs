//! Periodic sensor sampling with latest-wins publication.
//!
//! ```text
//!  SensorPort ──read_frame──▶ SensorSampler ──signal()──▶ LatestReading ──▶ controller
//!                                  │
//!                                  └── failures ──▶ DecoderDiagnostics ──▶ AlertSink
//! ```
//!
//! A failed read publishes nothing: the controller keeps acting on the
//! last good reading, and the sampler's own held value is left untouched.

use std::time::Duration;

use log::{debug, warn};

use crate::app::ports::{AlertSink, SensorPort};
use crate::channels::LatestReading;
use crate::diagnostics::DecoderDiagnostics;
use crate::error::DecodeError;

use super::SensorReading;

pub struct SensorSampler<S> {
    sensor: S,
    latest: Option<SensorReading>,
    diagnostics: DecoderDiagnostics,
}

impl<S: SensorPort> SensorSampler<S> {
    pub fn new(sensor: S, alert_after_failures: u32) -> Self {
        Self {
            sensor,
            latest: None,
            diagnostics: DecoderDiagnostics::new(alert_after_failures),
        }
    }

    /// Run one read transaction.
    ///
    /// On failure the held reading is retained and the error is recorded;
    /// an alert is raised once the consecutive-failure streak is long enough.
    pub fn sample(
        &mut self,
        alerts: &mut impl AlertSink,
    ) -> Result<SensorReading, DecodeError> {
        match self.sensor.read_frame() {
            Ok(frame) => {
                let reading = SensorReading::from_frame(&frame);
                self.diagnostics.record_success();
                self.latest = Some(reading);
                debug!(
                    "SENSOR | T={:.1}\u{00b0}C H={:.1}%",
                    reading.temperature, reading.humidity
                );
                Ok(reading)
            }
            Err(e) => {
                warn!(
                    "SENSOR | read failed: {} (streak={})",
                    e,
                    self.diagnostics.streak + 1
                );
                if let Some(text) = self.diagnostics.record_failure(e) {
                    alerts.raise_alert(&text);
                }
                Err(e)
            }
        }
    }

    /// Sample once and, on success, overwrite the single-slot channel.
    /// Never blocks.
    pub fn sample_and_publish(&mut self, out: &LatestReading, alerts: &mut impl AlertSink) {
        if let Ok(reading) = self.sample(alerts) {
            out.signal(reading);
        }
    }

    /// Task body: sample every `period`, forever.
    pub fn run(mut self, period: Duration, out: &LatestReading, mut alerts: impl AlertSink) {
        loop {
            self.sample_and_publish(out, &mut alerts);
            std::thread::sleep(period);
        }
    }

    /// Last successful reading, if any.
    pub fn latest(&self) -> Option<SensorReading> {
        self.latest
    }

    pub fn diagnostics(&self) -> &DecoderDiagnostics {
        &self.diagnostics
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
