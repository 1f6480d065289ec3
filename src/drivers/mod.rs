//! Indicator drivers, keypad scanning, hardware initialisation and
//! peripheral helpers.

pub mod gpio;
pub mod hw_init;
pub mod keypad;
pub mod strobe;
pub mod watchdog;
