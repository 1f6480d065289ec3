//! `embedded-hal` digital pin over the raw `hw_init` GPIO helpers.
//!
//! Lets the portable keypad scanner drive the board pins on ESP-IDF and the
//! simulated GPIO bank on the host.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::hw_init;

/// A GPIO number already configured by [`hw_init::init_peripherals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin {
    pin: i32,
}

impl GpioPin {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub fn number(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true);
        Ok(())
    }
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.pin))
    }
}

/// Build an array of pins from a pin-number table.
pub fn pins<const N: usize>(numbers: [i32; N]) -> [GpioPin; N] {
    numbers.map(GpioPin::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pins 50+ are reserved for this module's tests.

    #[test]
    fn output_is_visible_as_input() {
        let mut out = GpioPin::new(50);
        let mut inp = GpioPin::new(50);
        out.set_high().unwrap();
        assert!(inp.is_high().unwrap());
        out.set_low().unwrap();
        assert!(inp.is_low().unwrap());
    }

    #[test]
    fn pins_helper_keeps_order() {
        let p = pins([51, 52, 53]);
        assert_eq!(p.map(|g| g.number()), [51, 52, 53]);
    }
}
