//! System configuration parameters
//!
//! All tunable parameters for the alarm controller.  Values are compiled-in
//! defaults; a JSON override document may replace them at boot.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Longest disarm code the controller accepts.
pub const MAX_CODE_LEN: usize = 8;

/// Slowest strobe half-period accepted from configuration.
pub const MAX_STROBE_HALF_PERIOD_MS: u32 = 60_000;

/// Core system configuration
///
/// Fields missing from a JSON override keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    // --- Code entry ---
    /// Disarm code, compared character by character.
    pub stored_code: heapless::String<MAX_CODE_LEN>,
    /// Number of keys in a complete code attempt (must match `stored_code`).
    pub code_length: usize,
    /// Consecutive incorrect codes before the keypad is locked out.
    pub failure_threshold: u32,

    // --- Thresholds ---
    /// Temperature (Celsius) above which the over-temperature condition is raised.
    pub temperature_limit_c: f32,
    /// MQ-2 gas concentration (ppm) above which gas is reported as detected.
    pub gas_threshold_ppm: f32,

    // --- Strobe ---
    /// Strobe half-period when only gas is detected (milliseconds)
    pub strobe_gas_ms: u32,
    /// Strobe half-period when only over-temperature is detected (milliseconds)
    pub strobe_over_temp_ms: u32,
    /// Strobe half-period when both conditions are present (milliseconds)
    pub strobe_both_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status screen refresh interval (milliseconds)
    pub display_refresh_ms: u32,
    /// Telemetry report interval (milliseconds)
    pub telemetry_interval_ms: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        let mut stored_code = heapless::String::new();
        // Four ASCII digits always fit in MAX_CODE_LEN.
        let _ = stored_code.push_str("2005");

        Self {
            // Code entry
            stored_code,
            code_length: 4,
            failure_threshold: 3,

            // Thresholds
            temperature_limit_c: 30.0,
            gas_threshold_ppm: 2000.0,

            // Strobe
            strobe_gas_ms: 1000,
            strobe_over_temp_ms: 500,
            strobe_both_ms: 100,

            // Timing
            control_loop_interval_ms: 10,  // 100 Hz
            display_refresh_ms: 1000,      // 1 Hz
            telemetry_interval_ms: 60_000, // 1/min
        }
    }
}

impl AlarmConfig {
    /// Parse a JSON override document and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the controller unable to disarm or
    /// unable to detect anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code_chars = self.stored_code.chars().count();
        if code_chars == 0 {
            return Err(ConfigError::ValidationFailed("stored_code must not be empty"));
        }
        if code_chars != self.code_length {
            return Err(ConfigError::ValidationFailed(
                "code_length must equal the number of characters in stored_code",
            ));
        }
        if self.failure_threshold == 0 {
            return Err(ConfigError::ValidationFailed("failure_threshold must be at least 1"));
        }
        if !self.temperature_limit_c.is_finite() {
            return Err(ConfigError::ValidationFailed("temperature_limit_c must be finite"));
        }
        if !self.gas_threshold_ppm.is_finite() || self.gas_threshold_ppm <= 0.0 {
            return Err(ConfigError::ValidationFailed("gas_threshold_ppm must be positive"));
        }
        if self.control_loop_interval_ms == 0 || self.display_refresh_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop and refresh intervals must be non-zero"));
        }
        let strobe_range = 1..=MAX_STROBE_HALF_PERIOD_MS;
        if ![self.strobe_gas_ms, self.strobe_over_temp_ms, self.strobe_both_ms]
            .iter()
            .all(|ms| strobe_range.contains(ms))
        {
            return Err(ConfigError::ValidationFailed(
                "strobe half-periods must be within 1..=60000 ms",
            ));
        }
        Ok(())
    }
}

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for [`AlarmConfig`].
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config document malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = AlarmConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.stored_code.as_str(), "2005");
        assert_eq!(c.code_length, 4);
        assert_eq!(c.failure_threshold, 3);
        assert!((c.temperature_limit_c - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn strobe_gets_faster_with_more_conditions() {
        let c = AlarmConfig::default();
        assert!(c.strobe_both_ms < c.strobe_over_temp_ms);
        assert!(c.strobe_over_temp_ms < c.strobe_gas_ms);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = AlarmConfig::default();
        assert!(
            c.control_loop_interval_ms < c.display_refresh_ms,
            "control loop should be faster than display refresh"
        );
        assert!(
            c.display_refresh_ms < c.telemetry_interval_ms,
            "display refresh should be faster than telemetry"
        );
    }

    #[test]
    fn json_override_roundtrip() {
        let c = AlarmConfig::default();
        let json = serde_json::to_vec(&c).unwrap();
        let c2 = AlarmConfig::from_json(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn json_override_changes_code() {
        let mut c = AlarmConfig::default();
        c.stored_code.clear();
        c.stored_code.push_str("913").unwrap();
        c.code_length = 3;
        let json = serde_json::to_vec(&c).unwrap();
        let parsed = AlarmConfig::from_json(&json).unwrap();
        assert_eq!(parsed.stored_code.as_str(), "913");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let c = AlarmConfig::from_json(br#"{"failure_threshold": 5}"#).unwrap();
        assert_eq!(c.failure_threshold, 5);
        assert_eq!(c.stored_code.as_str(), "2005");
    }

    #[test]
    fn garbage_json_is_malformed() {
        assert_eq!(AlarmConfig::from_json(b"{not json"), Err(ConfigError::Malformed));
    }

    #[test]
    fn code_length_mismatch_rejected() {
        let mut c = AlarmConfig::default();
        c.code_length = 5;
        assert!(matches!(c.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn empty_code_rejected() {
        let mut c = AlarmConfig::default();
        c.stored_code.clear();
        c.code_length = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_failure_threshold_rejected() {
        let c = AlarmConfig {
            failure_threshold: 0,
            ..AlarmConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn non_finite_temperature_rejected() {
        let c = AlarmConfig {
            temperature_limit_c: f32::NAN,
            ..AlarmConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn strobe_period_out_of_range_rejected() {
        let huge = AlarmConfig::from_json(br#"{"strobe_gas_ms": 2147483648}"#);
        assert!(matches!(huge, Err(ConfigError::ValidationFailed(_))));

        let zero = AlarmConfig {
            strobe_both_ms: 0,
            ..AlarmConfig::default()
        };
        assert!(zero.validate().is_err());

        let slowest = AlarmConfig {
            strobe_over_temp_ms: MAX_STROBE_HALF_PERIOD_MS,
            ..AlarmConfig::default()
        };
        assert!(slowest.validate().is_ok());
    }
}
