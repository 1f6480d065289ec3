//! MQ-2 combustible gas sensor.
//!
//! The analog output is averaged over [`GAS_SAMPLES`] reads, converted to
//! the sensor resistance ratio Rs/R0 and mapped onto the datasheet LPG
//! curve:
//!
//! ```text
//!   Rs  = (Vc - V) / V        (load resistor normalised to 1)
//!   ppm = 100 · (Rs / R0)^-2
//! ```
//!
//! A zero reading maps to 0 ppm rather than dividing by zero.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH4 via the oneshot API (initialised by hw_init).
//! On host/test: reads the simulated channel set by [`sim_set_gas_adc`].

use crate::drivers::hw_init::{self, ADC_MAX, V_REF};
use crate::error::SensorError;

use super::SampleRing;

pub const GAS_SAMPLES: usize = 10;

/// Heater/circuit supply voltage.
const V_CIRCUIT: f32 = 5.0;
/// Clean-air sensor resistance, in load-resistor units.
const R0: f32 = 10.0;

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gas_adc(raw: u16) {
    hw_init::sim_set_adc(hw_init::ADC1_CH_GAS, raw);
}

#[derive(Debug, Clone, Copy)]
pub struct GasReading {
    pub raw: u16,
    /// Averaged sensor output voltage.
    pub avg_voltage: f32,
    pub ppm: f32,
    pub detected: bool,
}

pub struct GasSensor {
    ring: SampleRing<GAS_SAMPLES>,
    threshold_ppm: f32,
    _adc_gpio: i32,
}

impl GasSensor {
    pub fn new(adc_gpio: i32, threshold_ppm: f32) -> Self {
        Self {
            ring: SampleRing::new(),
            threshold_ppm,
            _adc_gpio: adc_gpio,
        }
    }

    pub fn read(&mut self) -> Result<GasReading, SensorError> {
        let raw = hw_init::adc1_read(hw_init::ADC1_CH_GAS)?;
        if f32::from(raw) > ADC_MAX {
            return Err(SensorError::OutOfRange);
        }
        let voltage = (f32::from(raw) / ADC_MAX) * V_REF;
        let avg_voltage = self.ring.push(voltage);
        let ppm = voltage_to_ppm(avg_voltage);
        Ok(GasReading {
            raw,
            avg_voltage,
            ppm,
            detected: ppm > self.threshold_ppm,
        })
    }
}

pub fn voltage_to_ppm(voltage: f32) -> f32 {
    if voltage <= 0.0 {
        return 0.0;
    }
    let rs = (V_CIRCUIT - voltage) / voltage;
    let ratio = rs / R0;
    if ratio <= 0.0 {
        return f32::MAX;
    }
    100.0 * ratio.powi(-2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_voltage_is_clean_air() {
        assert_eq!(voltage_to_ppm(0.0), 0.0);
    }

    #[test]
    fn ppm_rises_with_voltage() {
        let low = voltage_to_ppm(0.5);
        let mid = voltage_to_ppm(1.5);
        let high = voltage_to_ppm(3.0);
        assert!(low < mid && mid < high);
    }

    #[test]
    fn curve_crosses_default_threshold_between_1v5_and_1v6() {
        assert!(voltage_to_ppm(1.5) < 2000.0);
        assert!(voltage_to_ppm(1.6) > 2000.0);
    }

    #[test]
    fn one_volt_is_625_ppm() {
        // Rs = 4, ratio = 0.4, 100 / 0.16
        assert!((voltage_to_ppm(1.0) - 625.0).abs() < 0.1);
    }
}
