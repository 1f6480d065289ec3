//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the board, stderr on the host).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | T={:.1}\u{00b0}C | gas={:.0}ppm | \
                     over_temp={} gas={} test={} | siren={} strobe={}ms | \
                     failures={} blocked={}",
                    t.state,
                    t.temperature_c,
                    t.gas_ppm,
                    t.over_temperature,
                    t.gas_detected,
                    t.manual_test,
                    if t.siren { "ON" } else { "OFF" },
                    t.strobe_half_period_ms,
                    t.failures,
                    t.blocked,
                );
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ConditionsChanged(c) => {
                info!(
                    "COND  | over_temp={} gas={}",
                    c.over_temperature, c.gas_detected
                );
            }
            AppEvent::CodeAccepted => {
                info!("CODE  | accepted");
            }
            AppEvent::CodeRejected { failures } => {
                warn!("CODE  | rejected, failures={}", failures);
            }
            AppEvent::CodeEntryAborted => {
                info!("CODE  | attempt cleared");
            }
            AppEvent::SystemBlocked { failures } => {
                error!("BLOCK | keypad locked after {} failures", failures);
            }
        }
    }
}
