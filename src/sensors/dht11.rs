//! DHT11 single-wire protocol decoder.
//!
//! One read transaction, host and device sharing an open-drain line:
//!
//! ```text
//!  host start        device response        40 data bits, MSB first
//! ────┐      ┌──┐       ┌──────┐     ┌──┐    ┌─────┐
//!     │ 20ms │40│ 80us  │ 80us │ 50us│  │50us│     │ ...
//!     └──────┘  └───────┘      └─────┘  └────┘     └──
//!                                        26us      70us
//!                                        = 0       = 1
//! ```
//!
//! The start pulse runs with interrupts enabled. Everything from the
//! device response to the last bit is polled inside one critical section
//! ([`BitTimer::critical`]); every wait has a microsecond budget so a dead
//! or glitching sensor can never wedge the sampler task.

use embedded_hal::delay::DelayNs;

use crate::error::DecodeError;

// ── Timing (µs unless noted) ──────────────────────────────────

/// Host start pulse; the datasheet asks for at least 18 ms.
const START_LOW_MS: u32 = 20;
/// Host release before switching to input.
const RELEASE_US: u32 = 40;
/// Budget for each phase of the device response (nominal 20-40 / 80 / 80).
const RESPONSE_BUDGET_US: u32 = 85;
/// Budget for the low preamble of each bit (nominal 50).
const BIT_LOW_BUDGET_US: u32 = 75;
/// Budget for the high phase of each bit (nominal 26-28 or 70).
const BIT_HIGH_BUDGET_US: u32 = 100;
/// High phases longer than this decode as `1`.
const ONE_THRESHOLD_US: u32 = 40;

const FRAME_BITS: usize = 40;

// ── Line + timer abstraction ──────────────────────────────────

/// A bidirectional single-wire data line.
pub trait SingleWireLine {
    /// Switch the pin to push-pull output.
    fn set_output(&mut self);
    /// Switch the pin to input; the pull-up holds the line high.
    fn set_input(&mut self);
    /// Drive the line (only meaningful in output mode).
    fn write(&mut self, high: bool);
    /// Sample the current line level.
    fn is_high(&mut self) -> bool;
}

/// Precise delays plus a monotonic microsecond clock and interrupt masking.
pub trait BitTimer: DelayNs {
    /// Monotonic microseconds since an arbitrary epoch.
    fn now_us(&self) -> u64;

    /// Run `f` with preemption disabled.
    fn critical<R>(f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}

// ── SensorFrame ───────────────────────────────────────────────

/// A checksum-validated 5-byte DHT frame.
///
/// Byte layout: humidity integer, humidity fraction, temperature integer,
/// temperature fraction, checksum. DHT11 parts send a zero fraction byte,
/// which collapses the values to whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorFrame {
    bytes: [u8; 5],
}

impl SensorFrame {
    /// Validate the checksum; the only way to obtain a frame.
    pub fn from_bytes(bytes: [u8; 5]) -> Result<Self, DecodeError> {
        if checksum(&bytes) == bytes[4] {
            Ok(Self { bytes })
        } else {
            Err(DecodeError::ChecksumError)
        }
    }

    pub fn bytes(&self) -> [u8; 5] {
        self.bytes
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.bytes[0] as f32 + self.bytes[1] as f32 * 0.1
    }

    /// Temperature in °C.
    pub fn temperature(&self) -> f32 {
        self.bytes[2] as f32 + self.bytes[3] as f32 * 0.1
    }
}

/// Low byte of the sum of the four payload bytes.
pub fn checksum(bytes: &[u8; 5]) -> u8 {
    bytes[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

// ── Decoder ───────────────────────────────────────────────────

/// Bit-banged DHT11 reader over any [`SingleWireLine`] / [`BitTimer`] pair.
pub struct Dht11<L, T> {
    line: L,
    timer: T,
}

impl<L: SingleWireLine, T: BitTimer> Dht11<L, T> {
    pub fn new(line: L, timer: T) -> Self {
        Self { line, timer }
    }

    /// Perform one full read transaction.
    ///
    /// Partial frames are never returned: any phase overrunning its budget
    /// aborts the whole transaction.
    pub fn read_frame(&mut self) -> Result<SensorFrame, DecodeError> {
        self.line.set_output();
        self.line.write(false);
        self.timer.delay_ms(START_LOW_MS);
        self.line.write(true);
        self.timer.delay_us(RELEASE_US);
        self.line.set_input();

        let bytes = T::critical(|| self.receive())?;
        SensorFrame::from_bytes(bytes)
    }

    /// Device response plus 40 data bits. Runs inside the critical section.
    fn receive(&mut self) -> Result<[u8; 5], DecodeError> {
        self.wait_while(true, RESPONSE_BUDGET_US)
            .ok_or(DecodeError::NoResponse)?;
        self.wait_while(false, RESPONSE_BUDGET_US)
            .ok_or(DecodeError::NoResponse)?;
        self.wait_while(true, RESPONSE_BUDGET_US)
            .ok_or(DecodeError::NoResponse)?;

        let mut bytes = [0u8; 5];
        for i in 0..FRAME_BITS {
            self.wait_while(false, BIT_LOW_BUDGET_US)
                .ok_or(DecodeError::Timeout)?;
            let high_us = self
                .wait_while(true, BIT_HIGH_BUDGET_US)
                .ok_or(DecodeError::Timeout)?;
            if high_us > ONE_THRESHOLD_US {
                bytes[i / 8] |= 1 << (7 - i % 8);
            }
        }
        Ok(bytes)
    }

    /// Spin while the line sits at `level`. Returns how long it stayed
    /// there, or `None` once `budget_us` is exceeded.
    fn wait_while(&mut self, level: bool, budget_us: u32) -> Option<u32> {
        let start = self.timer.now_us();
        loop {
            let elapsed = self.timer.now_us().saturating_sub(start);
            if elapsed > u64::from(budget_us) {
                return None;
            }
            if self.line.is_high() != level {
                return Some(elapsed as u32);
            }
            self.timer.delay_us(1);
        }
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Give back the line and timer (tests inspect the simulated line).
    pub fn release(self) -> (L, T) {
        (self.line, self.timer)
    }
}

impl<L: SingleWireLine, T: BitTimer> crate::app::ports::SensorPort for Dht11<L, T> {
    fn read_frame(&mut self) -> Result<SensorFrame, DecodeError> {
        Dht11::read_frame(self)
    }
}
