//! Decoder health counters.
//!
//! The sampler records every transaction outcome here. Counters are plain
//! `u32`s owned by the sampler task; a consecutive-failure streak raises one
//! alert when it reaches the configured length and re-arms on the next
//! successful read.

use core::fmt::Write as _;

use crate::error::DecodeError;

/// Alert text, sized for the cloud alert field.
pub type AlertText = heapless::String<64>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderDiagnostics {
    pub successes: u32,
    pub no_response: u32,
    pub timeouts: u32,
    pub checksum_errors: u32,
    /// Failures since the last successful read.
    pub streak: u32,
    alert_after: u32,
}

impl DecoderDiagnostics {
    /// `alert_after == 0` never alerts.
    pub fn new(alert_after: u32) -> Self {
        Self {
            alert_after,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.successes = self.successes.saturating_add(1);
        self.streak = 0;
    }

    /// Count a failure. Returns alert text exactly once per streak.
    pub fn record_failure(&mut self, err: DecodeError) -> Option<AlertText> {
        let counter = match err {
            DecodeError::NoResponse => &mut self.no_response,
            DecodeError::Timeout => &mut self.timeouts,
            DecodeError::ChecksumError => &mut self.checksum_errors,
        };
        *counter = counter.saturating_add(1);
        self.streak = self.streak.saturating_add(1);

        if self.alert_after == 0 || self.streak != self.alert_after {
            return None;
        }
        let mut text = AlertText::new();
        let _ = write!(
            text,
            "Sensor read failing: {} ({} in a row)",
            err, self.streak
        );
        Some(text)
    }

    pub fn failures(&self) -> u32 {
        self.no_response + self.timeouts + self.checksum_errors
    }
}
