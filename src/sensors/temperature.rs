//! LM35 analog temperature sensor (10 mV/°C, 0 V at 0 °C).
//!
//! Read through ADC1 and smoothed over the last [`TEMP_SAMPLES`] reads.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH3 via the oneshot API (initialised by hw_init).
//! On host/test: reads the simulated channel set by [`sim_set_temp_adc`].

use crate::drivers::hw_init::{self, ADC_MAX, V_REF};
use crate::error::SensorError;

use super::SampleRing;

pub const TEMP_SAMPLES: usize = 10;

/// LM35 scale factor: 100 °C per volt.
const CELSIUS_PER_VOLT: f32 = 100.0;

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    hw_init::sim_set_adc(hw_init::ADC1_CH_TEMP, raw);
}

#[derive(Debug, Clone, Copy)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
    pub avg_celsius: f32,
}

pub struct TemperatureSensor {
    ring: SampleRing<TEMP_SAMPLES>,
    _adc_gpio: i32,
}

impl TemperatureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            ring: SampleRing::new(),
            _adc_gpio: adc_gpio,
        }
    }

    pub fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        let raw = hw_init::adc1_read(hw_init::ADC1_CH_TEMP)?;
        if f32::from(raw) > ADC_MAX {
            return Err(SensorError::OutOfRange);
        }
        let celsius = adc_to_celsius(raw);
        let avg_celsius = self.ring.push(celsius);
        Ok(TemperatureReading {
            raw,
            celsius,
            avg_celsius,
        })
    }
}

pub fn adc_to_celsius(raw: u16) -> f32 {
    (f32::from(raw) / ADC_MAX) * V_REF * CELSIUS_PER_VOLT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_volts_is_zero_celsius() {
        assert_eq!(adc_to_celsius(0), 0.0);
    }

    #[test]
    fn full_scale_is_330_celsius() {
        assert!((adc_to_celsius(4095) - 330.0).abs() < 1e-3);
    }

    #[test]
    fn thirty_degrees_sits_near_372_counts() {
        // 0.30 V / 3.3 V * 4095 ≈ 372.3
        assert!(adc_to_celsius(372) < 30.0);
        assert!(adc_to_celsius(373) > 30.0);
    }
}
