//! Unified error types for the RoomGuard firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! controller's error handling uniform. All variants are `Copy` so they can
//! be passed between tasks and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A single-wire sensor transaction failed.
    Decoder(DecodeError),
    /// Thresholds, periods, or pins are unusable. Fatal at startup.
    InvalidConfiguration(&'static str),
    /// A shared resource (the display) could not be locked in time.
    ResourceContended,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoder(e) => write!(f, "decoder: {e}"),
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::ResourceContended => write!(f, "resource contended"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Decoder errors
// ---------------------------------------------------------------------------

/// Failure of one sensor read transaction. All variants are recoverable:
/// the sampler keeps the previous reading and tries again next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The device never answered the start signal.
    NoResponse,
    /// A bit phase exceeded its timing budget mid-frame.
    Timeout,
    /// All 40 bits arrived but the checksum byte did not match.
    ChecksumError,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response"),
            Self::Timeout => write!(f, "timeout"),
            Self::ChecksumError => write!(f, "checksum error"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decoder(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
