//! Relay outputs, the emergency button, hardware initialisation, and task helpers.

pub mod button;
pub mod hw_init;
pub mod relay;
pub mod task_pin;
