//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::conditions::ConditionFlags;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The arming FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The evaluated alarm conditions changed.
    ConditionsChanged(ConditionFlags),

    /// The disarm code was entered correctly.
    CodeAccepted,

    /// A complete code attempt did not match.
    CodeRejected { failures: u32 },

    /// A failed attempt was cleared by the abort gesture.
    CodeEntryAborted,

    /// The failure threshold was reached; code entry is disabled.
    SystemBlocked { failures: u32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub state: StateId,
    pub temperature_c: f32,
    pub gas_ppm: f32,
    pub gas_detected: bool,
    pub over_temperature: bool,
    pub manual_test: bool,
    pub siren: bool,
    pub strobe_half_period_ms: u32,
    pub failures: u32,
    pub blocked: bool,
}
