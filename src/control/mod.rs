//! Control core: hysteresis bands, the emergency state machine, and the
//! [`engine::ControlEngine`] that owns the actuator state.

pub mod emergency;
pub mod engine;
pub mod hysteresis;

/// The five binary outputs the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    AirConditioner,
    FireWater,
    SoundAlarm,
    FireLed,
    ExtractorFan,
}

impl Actuator {
    pub const ALL: [Self; 5] = [
        Self::AirConditioner,
        Self::FireWater,
        Self::SoundAlarm,
        Self::FireLed,
        Self::ExtractorFan,
    ];

    /// User-facing device name used for cloud parameters.
    pub const fn device_name(self) -> &'static str {
        match self {
            Self::AirConditioner => "Air Conditioner",
            Self::FireWater => "Fire Water",
            Self::SoundAlarm => "Sound Alarm",
            Self::FireLed => "Fire LED",
            Self::ExtractorFan => "Extractor Fan",
        }
    }

    pub fn from_device_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.device_name() == name)
    }
}

/// Snapshot of every output plus the emergency flag.
///
/// Owned by the engine; everyone else sees copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub ac: bool,
    pub water: bool,
    pub sound: bool,
    pub fire_led: bool,
    pub fan: bool,
    pub emergency: bool,
}

impl ControlState {
    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::AirConditioner => self.ac,
            Actuator::FireWater => self.water,
            Actuator::SoundAlarm => self.sound,
            Actuator::FireLed => self.fire_led,
            Actuator::ExtractorFan => self.fan,
        }
    }

    pub fn set(&mut self, actuator: Actuator, on: bool) {
        let slot = match actuator {
            Actuator::AirConditioner => &mut self.ac,
            Actuator::FireWater => &mut self.water,
            Actuator::SoundAlarm => &mut self.sound,
            Actuator::FireLed => &mut self.fire_led,
            Actuator::ExtractorFan => &mut self.fan,
        };
        *slot = on;
    }

    /// Actuators whose output differs between `self` and `other`.
    pub fn changed_actuators(self, other: Self) -> impl Iterator<Item = (Actuator, bool)> {
        Actuator::ALL
            .into_iter()
            .filter(move |a| self.get(*a) != other.get(*a))
            .map(move |a| (a, other.get(a)))
    }
}
