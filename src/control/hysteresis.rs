//! Two-point hysteresis band.

/// Where a temperature sits relative to a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// At or below the off point.
    Below,
    /// Strictly between the two points; outputs hold.
    Deadband,
    /// At or above the on point.
    Above,
}

/// Switch on at `on_at`, off at `off_at`, hold in between.
///
/// Construction assumes `off_at < on_at`; `SystemConfig::validate` enforces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    on_at: f32,
    off_at: f32,
}

impl Hysteresis {
    pub const fn new(on_at: f32, off_at: f32) -> Self {
        Self { on_at, off_at }
    }

    pub fn zone(&self, value: f32) -> Zone {
        if value >= self.on_at {
            Zone::Above
        } else if value <= self.off_at {
            Zone::Below
        } else {
            Zone::Deadband
        }
    }

    /// Next output given the current one.
    pub fn next(&self, current: bool, value: f32) -> bool {
        match self.zone(value) {
            Zone::Above => true,
            Zone::Below => false,
            Zone::Deadband => current,
        }
    }
}
