//! Application core: alarm orchestration, zero I/O.
//!
//! Wires the alarm controller, the screen composer and the strobe pattern
//! into one control cycle.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
