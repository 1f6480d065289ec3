//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the keypad scanner and the indicator pins,
//! exposing them through the hardware ports.  This is the only module in
//! the system that touches actual hardware.  On non-espidf targets the
//! underlying drivers use the simulated GPIO bank and ADC channels.
//!
//! The character panel is kept as an in-memory mirror: every write lands
//! in [`HardwareAdapter::panel`] and is echoed to the log at debug level.

use log::{debug, warn};

use crate::app::ports::{DisplayPort, IndicatorPort, KeypadPort, SensorPort};
use crate::drivers::gpio::{self, GpioPin};
use crate::drivers::hw_init;
use crate::drivers::keypad::MatrixKeypad;
use crate::error::OutputError;
use crate::fsm::context::SensorSnapshot;
use crate::pins;
use crate::sensors::SensorHub;
use crate::ui::screen::{HEIGHT, WIDTH};

pub type BoardKeypad = MatrixKeypad<GpioPin, GpioPin>;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    keypad: BoardKeypad,
    panel: [heapless::String<WIDTH>; HEIGHT],
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, keypad: BoardKeypad) -> Self {
        Self {
            sensor_hub,
            keypad,
            panel: Default::default(),
        }
    }

    /// Keypad wired to the board's row and column pins.
    pub fn board_keypad() -> BoardKeypad {
        MatrixKeypad::new(
            gpio::pins(pins::KEYPAD_ROW_GPIOS),
            gpio::pins(pins::KEYPAD_COL_GPIOS),
        )
    }

    /// Current panel contents, one padded row per line.
    pub fn panel(&self) -> &[heapless::String<WIDTH>; HEIGHT] {
        &self.panel
    }
}

// ── SensorPort / KeypadPort ───────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all()
    }
}

impl KeypadPort for HardwareAdapter {
    fn poll_released_key(&mut self) -> Option<char> {
        match self.keypad.poll_released() {
            Ok(key) => key,
            Err(e) => {
                warn!("keypad scan failed: {e}");
                None
            }
        }
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl IndicatorPort for HardwareAdapter {
    fn set_siren(&mut self, on: bool) {
        hw_init::gpio_write(pins::SIREN_GPIO, on);
    }

    fn set_strobe(&mut self, lit: bool) {
        hw_init::gpio_write(pins::STROBE_GPIO, lit);
    }

    fn set_alarm_led(&mut self, on: bool) {
        hw_init::gpio_write(pins::ALARM_LED_GPIO, on);
    }

    fn set_incorrect_code_led(&mut self, on: bool) {
        hw_init::gpio_write(pins::INCORRECT_CODE_LED_GPIO, on);
    }

    fn set_system_blocked_led(&mut self, on: bool) {
        hw_init::gpio_write(pins::SYSTEM_BLOCKED_LED_GPIO, on);
    }

    fn all_off(&mut self) {
        self.set_siren(false);
        self.set_strobe(false);
        self.set_alarm_led(false);
        self.set_incorrect_code_led(false);
        self.set_system_blocked_led(false);
    }
}

// ── DisplayPort ───────────────────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn clear(&mut self) {
        for row in &mut self.panel {
            row.clear();
        }
        debug!("LCD | clear");
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), OutputError> {
        let slot = self.panel.get_mut(row).ok_or(OutputError::RowOutOfRange)?;
        slot.clear();
        for c in text.chars().chain(core::iter::repeat(' ')).take(WIDTH) {
            // Multi-byte chars can fill the buffer before WIDTH cells.
            if slot.push(c).is_err() {
                break;
            }
        }
        debug!("LCD | {row}: {}", slot.as_str());
        Ok(())
    }
}
