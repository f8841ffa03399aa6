//! Inter-task communication channels.
//!
//! Uses `embassy-sync` primitives to bridge the blocking sampler and button
//! threads with the controller's async input loop. All three tasks share
//! these static channels without heap allocation.
//!
//! ```text
//! ┌──────────────┐ SensorReading  ┌──────────────┐
//! │   Sampler    │───(overwrite)─▶│              │
//! └──────────────┘                │              │
//! ┌──────────────┐  ButtonEdge    │  Controller  │
//! │   Monitor    │───(bounded)───▶│              │
//! └──────────────┘                │              │
//! ┌──────────────┐ ControlCommand │              │
//! │ Cloud intake │───(bounded)───▶│              │
//! └──────────────┘                └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::{info, warn};

use crate::app::commands::ControlCommand;
use crate::drivers::button::ButtonEdge;

/// Single-slot, latest-wins reading hand-off. `signal()` never blocks and
/// replaces any value the controller has not consumed yet.
pub type LatestReading = Signal<CriticalSectionRawMutex, crate::sensors::SensorReading>;

/// Depth of the button-edge mailbox.
const BUTTON_DEPTH: usize = 8;

/// Depth of the remote command mailbox.
const COMMAND_DEPTH: usize = 8;

/// Non-lossy button edge mailbox: the monitor waits for space instead of dropping.
pub type ButtonMailbox = Channel<CriticalSectionRawMutex, ButtonEdge, BUTTON_DEPTH>;

/// Remote command mailbox: cloud writes → controller.
pub type CommandMailbox = Channel<CriticalSectionRawMutex, ControlCommand, COMMAND_DEPTH>;

/// Sampler → controller.
pub static LATEST_READING: LatestReading = Signal::new();

/// Monitor → controller.
pub static BUTTON_EDGES: ButtonMailbox = Channel::new();

/// Cloud intake → controller.
pub static COMMANDS: CommandMailbox = Channel::new();

/// Borrowed view of the three controller inputs.
#[derive(Clone, Copy)]
pub struct ControlInputs<'a> {
    pub readings: &'a LatestReading,
    pub buttons: &'a ButtonMailbox,
    pub commands: &'a CommandMailbox,
}

impl ControlInputs<'static> {
    /// The firmware-wide statics.
    pub fn global() -> Self {
        Self {
            readings: &LATEST_READING,
            buttons: &BUTTON_EDGES,
            commands: &COMMANDS,
        }
    }
}

/// Outcome of routing one inbound cloud parameter write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteWrite {
    Queued(ControlCommand),
    /// No such device or parameter; nothing queued.
    Unknown,
    /// Mailbox full; the write is dropped and the cloud keeps its old value.
    Busy,
}

/// Route an inbound `(device, param, value)` write into the command mailbox.
pub fn submit_remote_write(
    mailbox: &CommandMailbox,
    device: &str,
    param: &str,
    value: bool,
) -> RemoteWrite {
    let Some(cmd) = ControlCommand::from_remote_write(device, param, value) else {
        warn!("CLOUD | ignored write {}.{}={}", device, param, value);
        return RemoteWrite::Unknown;
    };
    match mailbox.try_send(cmd) {
        Ok(()) => {
            info!("CLOUD | received {}.{}={}", device, param, value);
            RemoteWrite::Queued(cmd)
        }
        Err(_) => {
            warn!("CLOUD | command mailbox full, dropped {:?}", cmd);
            RemoteWrite::Busy
        }
    }
}
