//! Host-side simulation of the DHT11 data line.
//!
//! A [`SimLine`] and [`SimTimer`] share one virtual microsecond clock. The
//! decoder's 1 µs polling delay advances the clock, so waveforms play back
//! deterministically regardless of host speed.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use super::dht11::{BitTimer, SingleWireLine};

// ── Clock ─────────────────────────────────────────────────────

/// Shared virtual clock, in microseconds.
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn now_us(&self) -> u64 {
        self.0.get()
    }

    pub fn advance_us(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }
}

// ── Waveform ──────────────────────────────────────────────────

/// What the device drives onto the line after the host releases it,
/// as `(level, duration_us)` segments followed by a constant tail.
#[derive(Debug, Clone)]
pub struct Waveform {
    segments: Vec<(bool, u64)>,
    tail_high: bool,
}

/// Segments before the first data bit.
const PREAMBLE_SEGMENTS: usize = 3;

impl Waveform {
    /// A nominal-timing transmission of `bytes`, sent verbatim.
    pub fn frame(bytes: [u8; 5]) -> Self {
        let mut segments = vec![(true, 10), (false, 80), (true, 80)];
        for byte in bytes {
            for bit in (0..8).rev() {
                let one = (byte >> bit) & 1 == 1;
                segments.push((false, 50));
                segments.push((true, if one { 70 } else { 26 }));
            }
        }
        segments.push((false, 50));
        Self {
            segments,
            tail_high: true,
        }
    }

    /// A disconnected sensor: the pull-up holds the line high forever.
    pub fn silent() -> Self {
        Self {
            segments: Vec::new(),
            tail_high: true,
        }
    }

    /// Stop after `bits` data bits with the line left high.
    pub fn truncated_after_bits(mut self, bits: usize) -> Self {
        self.segments.truncate(PREAMBLE_SEGMENTS + 2 * bits);
        self.tail_high = true;
        self
    }

    /// Stop after `bits` data bits with the line held low.
    pub fn stuck_low_after_bits(mut self, bits: usize) -> Self {
        self.segments.truncate(PREAMBLE_SEGMENTS + 2 * bits);
        self.tail_high = false;
        self
    }

    /// Stretch the high phase of data bit `index` to `high_us`.
    pub fn with_bit_high_us(mut self, index: usize, high_us: u64) -> Self {
        if let Some(seg) = self.segments.get_mut(PREAMBLE_SEGMENTS + 2 * index + 1) {
            seg.1 = high_us;
        }
        self
    }

    fn level_at(&self, offset_us: u64) -> bool {
        let mut start = 0;
        for &(level, duration) in &self.segments {
            if offset_us < start + duration {
                return level;
            }
            start += duration;
        }
        self.tail_high
    }
}

// ── Line ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Output,
    Input { since_us: u64 },
}

/// One host-driven level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWrite {
    pub at_us: u64,
    pub high: bool,
    pub in_critical: bool,
}

/// Simulated open-drain line with a device on the far end.
pub struct SimLine {
    clock: SimClock,
    waveform: Waveform,
    mode: Mode,
    driven_high: bool,
    outputs_set: u32,
    inputs_set: u32,
    writes: Vec<LineWrite>,
    samples: u32,
    samples_outside_critical: u32,
}

impl SimLine {
    pub fn new(clock: SimClock, waveform: Waveform) -> Self {
        Self {
            clock,
            waveform,
            mode: Mode::Input { since_us: 0 },
            driven_high: true,
            outputs_set: 0,
            inputs_set: 0,
            writes: Vec::new(),
            samples: 0,
            samples_outside_critical: 0,
        }
    }

    /// Load the device response for the next transaction.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn outputs_set(&self) -> u32 {
        self.outputs_set
    }

    pub fn inputs_set(&self) -> u32 {
        self.inputs_set
    }

    pub fn writes(&self) -> &[LineWrite] {
        &self.writes
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn samples_outside_critical(&self) -> u32 {
        self.samples_outside_critical
    }
}

impl SingleWireLine for SimLine {
    fn set_output(&mut self) {
        self.outputs_set += 1;
        self.mode = Mode::Output;
    }

    fn set_input(&mut self) {
        self.inputs_set += 1;
        self.mode = Mode::Input {
            since_us: self.clock.now_us(),
        };
    }

    fn write(&mut self, high: bool) {
        self.driven_high = high;
        self.writes.push(LineWrite {
            at_us: self.clock.now_us(),
            high,
            in_critical: SimTimer::critical_depth() > 0,
        });
    }

    fn is_high(&mut self) -> bool {
        self.samples += 1;
        if SimTimer::critical_depth() == 0 {
            self.samples_outside_critical += 1;
        }
        match self.mode {
            Mode::Output => self.driven_high,
            Mode::Input { since_us } => self
                .waveform
                .level_at(self.clock.now_us().saturating_sub(since_us)),
        }
    }
}

// ── Timer ─────────────────────────────────────────────────────

thread_local! {
    static CRITICAL_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Delays advance the shared clock instead of sleeping.
pub struct SimTimer {
    clock: SimClock,
}

impl SimTimer {
    pub fn new(clock: SimClock) -> Self {
        Self { clock }
    }

    /// Nesting depth of [`BitTimer::critical`] on the calling thread.
    pub fn critical_depth() -> u32 {
        CRITICAL_DEPTH.with(Cell::get)
    }
}

impl DelayNs for SimTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_us(u64::from(ns.div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_us(u64::from(ms) * 1_000);
    }
}

impl BitTimer for SimTimer {
    fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    fn critical<R>(f: impl FnOnce() -> R) -> R {
        CRITICAL_DEPTH.with(|d| d.set(d.get() + 1));
        let result = f();
        CRITICAL_DEPTH.with(|d| d.set(d.get() - 1));
        result
    }
}
