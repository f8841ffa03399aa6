//! One-shot hardware peripheral initialization and raw GPIO helpers.
//!
//! Configures GPIO directions and pulls using raw ESP-IDF sys calls. Called
//! once from `main()` before any task is spawned. Also hosts the two
//! bit-level primitives the DHT11 decoder runs on: [`GpioLine`] and
//! [`RomTimer`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use crate::config::PinAssignment;
use crate::sensors::dht11::{BitTimer, SingleWireLine};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed { pin: i32, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed { pin, rc } => {
                write!(f, "GPIO{} config failed (rc={})", pin, rc)
            }
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(pins: &PinAssignment) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task exists.
    unsafe {
        init_button(pins.emergency_button)?;
        init_relays(pins)?;
        init_dht_line(pins.dht_data)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(pins: &PinAssignment) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): peripheral init skipped (dht=GPIO{}, button=GPIO{})",
        pins.dht_data,
        pins.emergency_button
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn configure(
    pin: i32,
    mode: gpio_mode_t,
    pull_up: bool,
) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed { pin, rc: ret });
    }
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_button(pin: i32) -> Result<(), HwInitError> {
    unsafe { configure(pin, gpio_mode_t_GPIO_MODE_INPUT, true)? };
    info!("hw_init: emergency button on GPIO{}", pin);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_relays(pins: &PinAssignment) -> Result<(), HwInitError> {
    let output_pins = [
        pins.ac_relay,
        pins.water_valve,
        pins.sound_alarm,
        pins.fire_led,
        pins.extractor_fan,
    ];

    for &pin in &output_pins {
        unsafe {
            configure(pin, gpio_mode_t_GPIO_MODE_OUTPUT, false)?;
            gpio_set_level(pin, 0);
        }
    }

    info!("hw_init: relay outputs configured (all off)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── DHT11 data line ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_dht_line(pin: i32) -> Result<(), HwInitError> {
    unsafe {
        configure(pin, gpio_mode_t_GPIO_MODE_INPUT, true)?;
    }
    info!("hw_init: DHT11 data line on GPIO{}", pin);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_set_output(pin: i32, output: bool) {
    let mode = if output {
        gpio_mode_t_GPIO_MODE_OUTPUT
    } else {
        gpio_mode_t_GPIO_MODE_INPUT
    };
    // SAFETY: direction change on a pin owned by the sampler task.
    unsafe {
        gpio_set_direction(pin, mode);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_output(_pin: i32, _output: bool) {}

/// The DHT11 data pin, switched between output and input per transaction.
pub struct GpioLine {
    pin: i32,
}

impl GpioLine {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl SingleWireLine for GpioLine {
    fn set_output(&mut self) {
        gpio_set_output(self.pin, true);
    }

    fn set_input(&mut self) {
        gpio_set_output(self.pin, false);
    }

    fn write(&mut self, high: bool) {
        gpio_write(self.pin, high);
    }

    fn is_high(&mut self) -> bool {
        gpio_read(self.pin)
    }
}

/// Pulled-up input pin read through [`gpio_read`].
pub struct GpioInput {
    pin: i32,
}

impl GpioInput {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioInput {
    type Error = core::convert::Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.pin))
    }
}

// ── ROM delay + high-resolution timer ─────────────────────────

/// Busy-wait delays from the ROM, timestamps from `esp_timer`.
pub struct RomTimer {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for RomTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl RomTimer {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for RomTimer {
    fn delay_ns(&mut self, ns: u32) {
        // SAFETY: esp_rom_delay_us is a calibrated busy loop with no side effects.
        unsafe { esp_rom_delay_us(ns.div_ceil(1_000)) }
    }

    fn delay_us(&mut self, us: u32) {
        // SAFETY: as above.
        unsafe { esp_rom_delay_us(us) }
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for RomTimer {
    fn delay_ns(&mut self, ns: u32) {
        let until = std::time::Instant::now() + std::time::Duration::from_nanos(u64::from(ns));
        while std::time::Instant::now() < until {
            core::hint::spin_loop();
        }
    }
}

#[cfg(target_os = "espidf")]
impl BitTimer for RomTimer {
    fn now_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads a free-running counter.
        (unsafe { esp_timer_get_time() }) as u64
    }

    fn critical<R>(f: impl FnOnce() -> R) -> R {
        esp_idf_hal::interrupt::free(f)
    }
}

#[cfg(not(target_os = "espidf"))]
impl BitTimer for RomTimer {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
