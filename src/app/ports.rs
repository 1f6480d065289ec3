//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, keypad, indicators, display, event sinks,
//! configuration) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.

use crate::config::{AlarmConfig, ConfigError};
use crate::error::OutputError;
use crate::fsm::context::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Read every sensor and return a unified snapshot.
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Keypad port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

pub trait KeypadPort {
    /// The key released since the previous poll, if any.  At most one
    /// key per control cycle.
    fn poll_released_key(&mut self) -> Option<char>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for every binary output on the panel.
pub trait IndicatorPort {
    fn set_siren(&mut self, on: bool);

    /// Strobe lamp level for this cycle (the pattern is computed upstream).
    fn set_strobe(&mut self, lit: bool);

    fn set_alarm_led(&mut self, on: bool);

    fn set_incorrect_code_led(&mut self, on: bool);

    fn set_system_blocked_led(&mut self, on: bool);

    /// Everything off: safe start-up state.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → 20×4 character panel)
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Blank the whole panel.
    fn clear(&mut self);

    /// Replace row `row` with `text`, padded or truncated to the panel
    /// width.
    fn write_line(&mut self, row: usize, text: &str) -> Result<(), OutputError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Supplies the configuration the service is built from.
///
/// Implementations MUST return only validated configuration; invalid
/// values are rejected with [`ConfigError::ValidationFailed`], never
/// clamped.
pub trait ConfigPort {
    fn load(&self) -> Result<AlarmConfig, ConfigError>;
}
