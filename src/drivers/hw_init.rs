//! One-shot hardware peripheral initialization and raw register helpers.
//!
//! Configures the ADC channels and GPIO directions using raw ESP-IDF sys
//! calls.  Called once from `main()` before the control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot ADC and `gpio_*` register calls.
//! On host/test: a simulated GPIO bank (one atomic bit per pin) and
//! simulated ADC channels that tests and the host build inject into.

use core::sync::atomic::{AtomicU16, AtomicU64, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::{Error, SensorError};
#[cfg(target_os = "espidf")]
use crate::pins;

// ── ADC channel map ───────────────────────────────────────────

pub const ADC1_CH_TEMP: u32 = 3;
pub const ADC1_CH_GAS: u32 = 4;

/// Full-scale value of a 12-bit ADC read.
pub const ADC_MAX: f32 = 4095.0;
/// ADC reference voltage with 12 dB attenuation.
pub const V_REF: f32 = 3.3;

// ── Bring-up ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), Error> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), Error> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), Error> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 unit"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_TEMP, ADC1_CH_GAS] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("ADC1 channel"));
        }
    }

    info!("hw_init: ADC1 configured (CH3=temp, CH4=gas)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

static SIM_ADC_TEMP: AtomicU16 = AtomicU16::new(0);
static SIM_ADC_GAS: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    match channel {
        ADC1_CH_TEMP => Ok(SIM_ADC_TEMP.load(Ordering::Relaxed)),
        ADC1_CH_GAS => Ok(SIM_ADC_GAS.load(Ordering::Relaxed)),
        _ => Err(SensorError::AdcReadFailed),
    }
}

/// Inject a raw reading for a simulated ADC channel.
pub fn sim_set_adc(channel: u32, raw: u16) {
    match channel {
        ADC1_CH_TEMP => SIM_ADC_TEMP.store(raw, Ordering::Relaxed),
        ADC1_CH_GAS => SIM_ADC_GAS.store(raw, Ordering::Relaxed),
        _ => {}
    }
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), Error> {
    for &pin in &pins::KEYPAD_COL_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("keypad column GPIO"));
        }
    }

    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::TEST_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("test button GPIO"));
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulated pin levels, one bit per GPIO number.
static SIM_GPIO_LEVELS: AtomicU64 = AtomicU64::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_GPIO_LEVELS.load(Ordering::Acquire) & (1u64 << pin) != 0
}

/// Drive a simulated pin level (inputs as well as outputs).
pub fn sim_set_gpio(pin: i32, high: bool) {
    if high {
        SIM_GPIO_LEVELS.fetch_or(1u64 << pin, Ordering::AcqRel);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!(1u64 << pin), Ordering::AcqRel);
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), Error> {
    let output_pins = [
        pins::SIREN_GPIO,
        pins::STROBE_GPIO,
        pins::ALARM_LED_GPIO,
        pins::INCORRECT_CODE_LED_GPIO,
        pins::SYSTEM_BLOCKED_LED_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("indicator GPIO"));
        }
        unsafe { gpio_set_level(pin as gpio_num_t, 0) };
    }

    // Rows idle HIGH; the scan pulls one LOW at a time.
    for &pin in &pins::KEYPAD_ROW_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("keypad row GPIO"));
        }
        unsafe { gpio_set_level(pin as gpio_num_t, 1) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin as gpio_num_t, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim_set_gpio(pin, high);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pins 40+ are not wired on the board, so tests cannot collide with
    // the sensor and keypad simulations.

    #[test]
    fn sim_gpio_write_then_read() {
        gpio_write(40, true);
        assert!(gpio_read(40));
        gpio_write(40, false);
        assert!(!gpio_read(40));
    }

    #[test]
    fn sim_gpio_pins_are_independent() {
        sim_set_gpio(41, true);
        sim_set_gpio(42, false);
        assert!(gpio_read(41));
        assert!(!gpio_read(42));
    }

    #[test]
    fn unknown_adc_channel_fails() {
        assert_eq!(adc1_read(9), Err(SensorError::AdcReadFailed));
    }
}
