//! FireAlarm Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                LogEventSink   EmbeddedConfig  │
//! │  (Sensor+Keypad+Indicator+LCD)  (EventSink)    (ConfigPort)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Conditions · Arming FSM · Code entry · Screen         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info};

use firealarm::adapters::embedded_config::EmbeddedConfig;
use firealarm::adapters::hardware::HardwareAdapter;
use firealarm::adapters::log_sink::LogEventSink;
use firealarm::app::ports::ConfigPort;
use firealarm::app::service::AppService;
use firealarm::drivers::{hw_init, watchdog::Watchdog};
use firealarm::error::Error;
use firealarm::pins;
use firealarm::sensors::SensorHub;
use firealarm::sensors::gas::GasSensor;
use firealarm::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FireAlarm v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Nothing can be sensed or sounded; the watchdog is not armed
        // yet, so report and stop here.
        error!("HAL init failed: {e}");
        return Err(e).context("peripheral bring-up");
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = EmbeddedConfig::from_build()
        .load()
        .map_err(Error::from)
        .context("loading configuration")?;
    let loop_period = Duration::from_millis(u64::from(config.control_loop_interval_ms));

    // ── 4. Adapters ───────────────────────────────────────────
    let hub = SensorHub::new(
        TemperatureSensor::new(pins::TEMP_ADC_GPIO),
        GasSensor::new(pins::GAS_ADC_GPIO, config.gas_threshold_ppm),
        pins::TEST_BUTTON_GPIO,
    );
    let mut hw = HardwareAdapter::new(hub, HardwareAdapter::board_keypad());
    let mut sink = LogEventSink::new();

    // ── 5. Application service ────────────────────────────────
    let mut app = AppService::new(config)
        .map_err(Error::from)
        .context("building alarm service")?;
    app.start(&mut hw, &mut sink);

    let mut watchdog = Watchdog::default();

    // ── 6. Fixed-rate control loop ────────────────────────────
    let mut next = Instant::now();
    loop {
        app.tick(&mut hw, &mut sink);
        watchdog.feed();

        next += loop_period;
        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
        } else {
            // Overran; resynchronise instead of bursting to catch up.
            next = now;
        }
    }
}
