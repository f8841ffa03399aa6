//! Status display text and the shared display handle.
//!
//! ```text
//!  ┌────────────────┐
//!  │T:27.3C H:65%   │   line 1: latest reading
//!  │A1 W0 S0 F0 L0  │   line 2: outputs, or "!! EMERGENCY !!"
//!  └────────────────┘
//! ```
//!
//! The panel is a shared resource: renders take the lock with a bounded
//! wait and are skipped with [`Error::ResourceContended`] on timeout.

use core::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use crate::app::ports::DisplaySink;
use crate::control::ControlState;
use crate::error::{Error, Result};
use crate::sensors::SensorReading;

/// One line of a 128x32 panel at 6x8 glyphs, with headroom.
pub type Line = heapless::String<24>;

const EMERGENCY_BANNER: &str = "!! EMERGENCY !!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLines {
    pub top: Line,
    pub bottom: Line,
}

impl StatusLines {
    pub fn compose(reading: Option<&SensorReading>, state: &ControlState) -> Self {
        let mut top = Line::new();
        match reading.filter(|r| r.valid) {
            Some(r) => {
                let _ = write!(top, "T:{:.1}C H:{:.0}%", r.temperature, r.humidity);
            }
            None => {
                let _ = top.push_str("T:--.-C H:--%");
            }
        }

        let mut bottom = Line::new();
        if state.emergency {
            let _ = bottom.push_str(EMERGENCY_BANNER);
        } else {
            let _ = write!(
                bottom,
                "A{} W{} S{} F{} L{}",
                u8::from(state.ac),
                u8::from(state.water),
                u8::from(state.sound),
                u8::from(state.fan),
                u8::from(state.fire_led),
            );
        }
        Self { top, bottom }
    }
}

/// Cloneable handle to a display shared between tasks.
pub struct SharedDisplay<D> {
    inner: Arc<Mutex<D>>,
    lock_timeout: Duration,
}

impl<D> Clone for SharedDisplay<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            lock_timeout: self.lock_timeout,
        }
    }
}

impl<D: DisplaySink> SharedDisplay<D> {
    pub fn new(display: D, lock_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(display)),
            lock_timeout,
        }
    }

    /// Unbounded lock for boot-time or exclusive use.
    pub fn lock(&self) -> MutexGuard<'_, D> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the display, waiting at most the configured timeout.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut D) -> R) -> Result<R> {
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match self.inner.try_lock() {
                Ok(mut guard) => return Ok(f(&mut *guard)),
                Err(TryLockError::Poisoned(p)) => return Ok(f(&mut *p.into_inner())),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(Error::ResourceContended);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}

impl<D: DisplaySink> DisplaySink for SharedDisplay<D> {
    fn render(&mut self, lines: &StatusLines) -> Result<()> {
        self.try_with(|d| d.render(lines))?
    }
}
