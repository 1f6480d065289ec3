//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSnapshot`] each
//! cycle for the alarm controller.

pub mod gas;
pub mod temperature;

use log::warn;

use crate::drivers::hw_init;
use crate::fsm::context::SensorSnapshot;
use gas::GasSensor;
use temperature::TemperatureSensor;

/// Fixed-capacity running average over the last `N` samples.
#[derive(Debug, Clone)]
pub struct SampleRing<const N: usize> {
    ring: [f32; N],
    head: usize,
    count: usize,
}

impl<const N: usize> SampleRing<N> {
    pub const fn new() -> Self {
        Self {
            ring: [0.0; N],
            head: 0,
            count: 0,
        }
    }

    /// Store a sample and return the average of everything held so far.
    pub fn push(&mut self, sample: f32) -> f32 {
        self.ring[self.head] = sample;
        self.head = (self.head + 1) % N;
        if self.count < N {
            self.count += 1;
        }
        self.average()
    }

    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        let sum: f32 = self.ring[..self.count].iter().sum();
        sum / self.count as f32
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<const N: usize> Default for SampleRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    pub temperature: TemperatureSensor,
    pub gas: GasSensor,
    test_button_gpio: i32,
    last: SensorSnapshot,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(temperature: TemperatureSensor, gas: GasSensor, test_button_gpio: i32) -> Self {
        Self {
            temperature,
            gas,
            test_button_gpio,
            last: SensorSnapshot::default(),
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Individual read failures are logged and the previous good value is
    /// retained.
    pub fn read_all(&mut self) -> SensorSnapshot {
        match self.temperature.read() {
            Ok(t) => self.last.temperature_c = t.avg_celsius,
            Err(e) => warn!("temperature read failed: {e}"),
        }
        match self.gas.read() {
            Ok(g) => {
                self.last.gas_ppm = g.ppm;
                self.last.gas_detected = g.detected;
            }
            Err(e) => warn!("gas read failed: {e}"),
        }
        self.last.manual_test = hw_init::gpio_read(self.test_button_gpio);
        self.last
    }
}
