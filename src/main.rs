//! RoomGuard Firmware: Main Entry Point
//!
//! Three FreeRTOS tasks around a hexagonal control core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Dht11<GpioLine>   HardwareAdapter   LogSink       LogDisplay  │
//! │  (SensorPort)      (ActuatorPort)    (Alert+Cloud) (Display)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  sampler (pri 5) ──LatestReading──┐                            │
//! │  monitor (pri 3) ──ButtonMailbox──┼──▶ controller (pri 4)      │
//! │  cloud intake    ──CommandMailbox─┘    ControlService          │
//! │                                        ControlEngine           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{error, info};

use roomguard::adapters::hardware::{HardwareAdapter, board_button, board_sensor};
use roomguard::adapters::log_sink::{LogDisplay, LogSink};
use roomguard::app::service::ControlService;
use roomguard::channels::{BUTTON_EDGES, ControlInputs, LATEST_READING};
use roomguard::config::SystemConfig;
use roomguard::display::SharedDisplay;
use roomguard::drivers::button::EmergencyMonitor;
use roomguard::drivers::hw_init;
use roomguard::drivers::relay::RelayBank;
use roomguard::drivers::task_pin::{CONTROLLER_TASK, MONITOR_TASK, SAMPLER_TASK, spawn_task};
use roomguard::pins;
use roomguard::sensors::sampler::SensorSampler;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RoomGuard v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (fatal if unusable) ──────────────────
    let config = SystemConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration rejected: {}, halting", e);
        return Err(e.into());
    }
    if let Ok(json) = serde_json::to_string(&config) {
        info!("Config: {}", json);
    }

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(&config.pins)?;
    info!(
        "Display: SSD1306 @0x{:02X} (SCL=GPIO{}, SDA=GPIO{})",
        pins::DISPLAY_I2C_ADDR,
        config.pins.i2c_scl,
        config.pins.i2c_sda
    );

    let mut hw = HardwareAdapter::new(RelayBank::new(&config.pins));
    let mut display = SharedDisplay::new(
        LogDisplay::new(),
        Duration::from_millis(config.display_lock_timeout_ms.into()),
    );

    // ── 4. Control service ────────────────────────────────────
    let mut service = ControlService::new(&config)?;
    service.start(&mut hw, &mut display);

    // ── 5. Tasks ──────────────────────────────────────────────
    let sampler = SensorSampler::new(
        board_sensor(&config.pins),
        config.decoder_alert_after_failures,
    );
    let sample_period = Duration::from_millis(config.sensor_read_interval_ms.into());
    spawn_task(SAMPLER_TASK, move || {
        sampler.run(sample_period, &LATEST_READING, LogSink::new());
    })?;

    let controller = spawn_task(CONTROLLER_TASK, move || {
        let mut sink = LogSink::new();
        futures_lite::future::block_on(service.run(
            ControlInputs::global(),
            &mut hw,
            &mut sink,
            &mut display,
        ));
    })?;

    let monitor = EmergencyMonitor::new(board_button(&config.pins), config.button_active_high);
    let poll_period = Duration::from_millis(config.button_poll_interval_ms.into());
    spawn_task(MONITOR_TASK, move || monitor.run(poll_period, &BUTTON_EDGES))?;

    info!("System ready.");

    controller
        .join()
        .map_err(|_| anyhow!("controller task panicked"))
}
