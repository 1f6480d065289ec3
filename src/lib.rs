//! FireAlarm firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the host
//! simulation. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod code_entry;
pub mod conditions;
pub mod config;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod ui;

// Platform layer: real drivers on espidf, simulated GPIO/ADC on the host.
pub mod adapters;
pub mod drivers;
pub mod sensors;
