//! Polled emergency button.
//!
//! ## Hardware
//!
//! Momentary switch on a pulled-up GPIO; pressing pulls the line to the
//! configured active level (low on the reference board).
//!
//! ## Edge detection
//!
//! Every poll compares the current level with the previous sample and
//! reports an edge only on inactive → active. Holding the button produces
//! one edge; releasing produces none.
//!
//! This is a single-sample filter, not a debouncer: at a 100 ms poll period
//! contact bounce is almost always absorbed between samples, but a press
//! that bounces across a sample boundary can report twice.

use std::time::Duration;

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::channels::ButtonMailbox;

/// One press of the emergency button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge;

pub struct EmergencyMonitor<P> {
    pin: P,
    active_high: bool,
    was_active: bool,
}

impl<P: InputPin> EmergencyMonitor<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self {
            pin,
            active_high,
            was_active: false,
        }
    }

    /// Sample the pin once. A read error counts as released.
    pub fn poll(&mut self) -> Option<ButtonEdge> {
        let active = match self.pin.is_high() {
            Ok(high) => high == self.active_high,
            Err(_) => {
                warn!("BUTTON | pin read failed");
                false
            }
        };
        let edge = active && !self.was_active;
        self.was_active = active;
        edge.then_some(ButtonEdge)
    }

    /// Task body: poll every `period` and forward edges without dropping any.
    pub fn run(mut self, period: Duration, mailbox: &ButtonMailbox) {
        loop {
            if let Some(edge) = self.poll() {
                info!("BUTTON | emergency button pressed");
                futures_lite::future::block_on(mailbox.send(edge));
            }
            std::thread::sleep(period);
        }
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}
