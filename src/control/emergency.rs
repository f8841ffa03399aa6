//! Emergency override state machine.
//!
//! ```text
//!                    t ≥ alarm_on         ┌──────────────────────────┐
//!            ┌───────────────────────────▶│ Active(AutoThreshold)    │
//!            │                            └──────────────────────────┘
//!   ┌────────┴─┐   t ≤ alarm_off (auto only) │ button / deactivate
//!   │  Normal  │◀────────────────────────────┘
//!   └────────┬─┘◀────────────────────────────┐ button / deactivate
//!            │   button / activate        ┌──┴───────────────────────┐
//!            └───────────────────────────▶│ Active(Manual)           │
//!                                         └──────────────────────────┘
//! ```
//!
//! Manual emergencies ignore temperature entirely; only an operator clears them.

use log::info;

use super::hysteresis::{Hysteresis, Zone};

/// Why the emergency was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyTrigger {
    Manual,
    AutoThreshold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmergencyMode {
    #[default]
    Normal,
    Active(EmergencyTrigger),
}

/// Events the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmergencyInput {
    Temperature(f32),
    ButtonEdge,
    Activate,
    Deactivate,
}

/// A mode change, reported so the caller can fan out side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyChange {
    Entered(EmergencyTrigger),
    Exited,
}

#[derive(Debug, Clone, Copy)]
pub struct EmergencyFsm {
    mode: EmergencyMode,
    alarm: Hysteresis,
}

impl EmergencyFsm {
    pub fn new(alarm: Hysteresis) -> Self {
        Self {
            mode: EmergencyMode::Normal,
            alarm,
        }
    }

    pub fn mode(&self) -> EmergencyMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, EmergencyMode::Active(_))
    }

    pub fn step(&mut self, input: EmergencyInput) -> Option<EmergencyChange> {
        use EmergencyInput as I;
        use EmergencyMode as M;

        let next = match (self.mode, input) {
            (M::Normal, I::Temperature(t)) if self.alarm.zone(t) == Zone::Above => {
                M::Active(EmergencyTrigger::AutoThreshold)
            }
            (M::Active(EmergencyTrigger::AutoThreshold), I::Temperature(t))
                if self.alarm.zone(t) == Zone::Below =>
            {
                M::Normal
            }
            (M::Normal, I::ButtonEdge | I::Activate) => M::Active(EmergencyTrigger::Manual),
            (M::Active(_), I::ButtonEdge | I::Deactivate) => M::Normal,
            (mode, _) => mode,
        };

        if next == self.mode {
            return None;
        }
        info!("EMERGENCY | {:?} -> {:?} on {:?}", self.mode, next, input);
        self.mode = next;
        Some(match next {
            M::Active(trigger) => EmergencyChange::Entered(trigger),
            M::Normal => EmergencyChange::Exited,
        })
    }
}
