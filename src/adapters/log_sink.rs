//! Log-based outbound adapters.
//!
//! [`LogSink`] implements [`AlertSink`] and [`CloudSink`] by writing to the
//! ESP-IDF logger (UART / USB-CDC in production); [`LogDisplay`] does the
//! same for [`DisplaySink`]. A cloud or OLED adapter would implement the
//! same traits.

use log::{info, warn};

use crate::app::ports::{AlertSink, CloudSink, DisplaySink};
use crate::display::StatusLines;
use crate::error::Result;

/// Adapter that logs every alert and cloud parameter report.
#[derive(Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for LogSink {
    fn raise_alert(&mut self, message: &str) {
        warn!("ALERT | {}", message);
    }
}

impl CloudSink for LogSink {
    fn report_bool(&mut self, device: &str, param: &str, value: bool) {
        info!("CLOUD | {}.{} = {}", device, param, value);
    }

    fn report_float(&mut self, device: &str, param: &str, value: f32) {
        info!("CLOUD | {}.{} = {:.1}", device, param, value);
    }
}

/// Logs status lines, skipping frames identical to the previous one.
#[derive(Default)]
pub struct LogDisplay {
    last: Option<StatusLines>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn last(&self) -> Option<&StatusLines> {
        self.last.as_ref()
    }
}

impl DisplaySink for LogDisplay {
    fn render(&mut self, lines: &StatusLines) -> Result<()> {
        if self.last.as_ref() != Some(lines) {
            info!("DISPLAY | {} | {}", lines.top, lines.bottom);
            self.last = Some(lines.clone());
        }
        Ok(())
    }
}
