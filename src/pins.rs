//! GPIO / peripheral pin assignments for the alarm main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// LM35 temperature sensor: 10 mV/°C analog output.
/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 4;

/// MQ-2 gas sensor: analog output via resistive divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const GAS_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// Self-test push-button, active HIGH with pull-down.
pub const TEST_BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Siren driver (active HIGH, via transistor).
pub const SIREN_GPIO: i32 = 6;
/// Strobe light driver (active HIGH).
pub const STROBE_GPIO: i32 = 7;
/// Alarm LED.
pub const ALARM_LED_GPIO: i32 = 8;
/// Incorrect-code LED.
pub const INCORRECT_CODE_LED_GPIO: i32 = 9;
/// System-blocked LED.
pub const SYSTEM_BLOCKED_LED_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// 4×4 matrix keypad
// ---------------------------------------------------------------------------

/// Row lines, driven LOW one at a time during a scan.
pub const KEYPAD_ROW_GPIOS: [i32; 4] = [11, 12, 13, 14];
/// Column lines, inputs with pull-up.  LOW = key in the driven row pressed.
pub const KEYPAD_COL_GPIOS: [i32; 4] = [15, 16, 17, 18];
