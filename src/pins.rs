//! GPIO / peripheral pin assignments for the RoomGuard controller board.
//!
//! Defaults for [`PinAssignment`](crate::config::PinAssignment). Change a
//! pin here and it propagates to every driver through the config.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, external 10 kΩ pull-up).
pub const DHT_DATA_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Emergency push-button, active-low with internal pull-up.
pub const EMERGENCY_BUTTON_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Relay outputs (active HIGH)
// ---------------------------------------------------------------------------

pub const AC_RELAY_GPIO: i32 = 4;
pub const WATER_VALVE_GPIO: i32 = 5;
pub const SOUND_ALARM_GPIO: i32 = 6;
pub const FIRE_LED_GPIO: i32 = 7;
pub const EXTRACTOR_FAN_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// I²C bus (SSD1306 128x32 status display)
// ---------------------------------------------------------------------------

pub const I2C_SCL_GPIO: i32 = 8;
pub const I2C_SDA_GPIO: i32 = 20;
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;
