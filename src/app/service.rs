//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the alarm controller, the screen composer and the
//! strobe pattern.  It exposes a clean, hardware-agnostic API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!   KeypadPort ──▶ │        AppService        │
//! IndicatorPort ◀──│ Alarm · Screen · Strobe  │
//!   DisplayPort ◀──└──────────────────────────┘
//! ```

use log::{info, warn};

use crate::alarm::{AlarmController, CycleReport};
use crate::code_entry::KeyOutcome;
use crate::conditions::ConditionFlags;
use crate::config::{AlarmConfig, ConfigError};
use crate::drivers::strobe::StrobePattern;
use crate::fsm::StateId;
use crate::fsm::context::IndicatorCommands;
use crate::ui::screen::{Frame, FrameKind, ScreenComposer, ScreenInput};

use super::events::{AppEvent, TelemetryData};
use super::ports::{DisplayPort, EventSink, IndicatorPort, KeypadPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    alarm: AlarmController,
    screen: ScreenComposer,
    strobe: StrobePattern,
    /// Milliseconds per control tick (from config).
    tick_ms: u32,
    tick_count: u64,
    /// Ticks between telemetry snapshots.
    telemetry_every: u64,
    last_conditions: ConditionFlags,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the alarm: call [`start`](Self::start) next.
    pub fn new(config: AlarmConfig) -> Result<Self, ConfigError> {
        let tick_ms = config.control_loop_interval_ms;
        let telemetry_ms = config.telemetry_interval_ms;
        let screen = ScreenComposer::new(config.display_refresh_ms);
        // Validates the config, so tick_ms is non-zero past this point.
        let alarm = AlarmController::new(config)?;
        let telemetry_every = u64::from((telemetry_ms / tick_ms).max(1));

        Ok(Self {
            alarm,
            screen,
            strobe: StrobePattern::new(),
            tick_ms,
            tick_count: 0,
            telemetry_every,
            last_conditions: ConditionFlags::default(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter Idle, switch every output off and draw the status labels.
    pub fn start(&mut self, hw: &mut (impl IndicatorPort + DisplayPort), sink: &mut impl EventSink) {
        self.alarm.start();
        hw.all_off();
        render(hw, &self.screen.boot_frame());
        sink.emit(&AppEvent::Started(self.alarm.state()));
        info!("AppService started in {:?}", self.alarm.state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle:
    /// read inputs → alarm core → display → indicators → events.
    ///
    /// `hw` satisfies every hardware port at once; this avoids several
    /// mutable borrows of the same adapter while keeping the port
    /// boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + KeypadPort + IndicatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Inputs
        let snapshot = hw.read_all();
        let key = hw.poll_released_key();

        // 2. Alarm core
        let report = self.alarm.tick(&snapshot, key);
        self.emit_cycle_events(&report, sink);

        // 3. Display (may fire the banner latch)
        self.update_display(hw, sink);

        // 4. Indicators
        self.apply_indicators(hw);

        // 5. Telemetry
        if self.tick_count % self.telemetry_every == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current alarm state.
    pub fn build_telemetry(&self) -> TelemetryData {
        let sensors = self.alarm.sensors();
        let conditions = self.alarm.conditions();
        let commands = self.alarm.commands();
        TelemetryData {
            state: self.alarm.state(),
            temperature_c: sensors.temperature_c,
            gas_ppm: sensors.gas_ppm,
            gas_detected: conditions.gas_detected,
            over_temperature: conditions.over_temperature,
            manual_test: sensors.manual_test,
            siren: commands.siren,
            strobe_half_period_ms: commands.strobe_half_period_ms,
            failures: self.alarm.failures(),
            blocked: self.alarm.alarm_state().blocked,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.alarm.state()
    }

    /// Indicator commands from the last cycle.
    pub fn commands(&self) -> IndicatorCommands {
        self.alarm.commands()
    }

    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    /// Live configuration.
    pub fn config(&self) -> &AlarmConfig {
        self.alarm.config()
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_cycle_events(&mut self, report: &CycleReport, sink: &mut impl EventSink) {
        if report.conditions != self.last_conditions {
            self.last_conditions = report.conditions;
            sink.emit(&AppEvent::ConditionsChanged(report.conditions));
        }

        if let Some((from, to)) = report.step {
            sink.emit(&AppEvent::StateChanged { from, to });
        }

        match report.key {
            Some(KeyOutcome::Accepted) => sink.emit(&AppEvent::CodeAccepted),
            Some(KeyOutcome::Rejected { failures, lockout }) => {
                sink.emit(&AppEvent::CodeRejected { failures });
                if lockout {
                    sink.emit(&AppEvent::SystemBlocked { failures });
                }
            }
            Some(KeyOutcome::Aborted) => sink.emit(&AppEvent::CodeEntryAborted),
            _ => {}
        }

        if let Some((from, to)) = report.key_transition {
            sink.emit(&AppEvent::StateChanged { from, to });
        }
    }

    fn update_display(&mut self, hw: &mut impl DisplayPort, sink: &mut impl EventSink) {
        let sensors = self.alarm.sensors();
        let input = ScreenInput {
            alarm: self.alarm.alarm_state(),
            conditions: self.alarm.conditions(),
            temperature_c: sensors.temperature_c,
            gas_detected: sensors.gas_detected,
            siren: self.alarm.commands().siren,
        };

        let Some(frame) = self.screen.update(&input, self.tick_ms) else {
            return;
        };
        render(hw, &frame);

        if frame.kind == FrameKind::Banner {
            let from = self.alarm.state();
            if self.alarm.mark_displayed() {
                sink.emit(&AppEvent::StateChanged {
                    from,
                    to: self.alarm.state(),
                });
            }
        }
    }

    /// Translate indicator commands into port calls.
    fn apply_indicators(&mut self, hw: &mut impl IndicatorPort) {
        let cmds = self.alarm.commands();
        self.strobe.set_half_period(cmds.strobe_half_period_ms);
        let strobe_lit = self.strobe.tick(self.tick_ms);

        hw.set_siren(cmds.siren);
        hw.set_strobe(strobe_lit);
        hw.set_alarm_led(cmds.alarm_led);
        hw.set_incorrect_code_led(cmds.incorrect_code_led);
        hw.set_system_blocked_led(cmds.system_blocked_led);
    }
}

/// Put a frame on the panel.  Banners and header redraws blank it first;
/// status frames overwrite their rows in place.
fn render(hw: &mut impl DisplayPort, frame: &Frame) {
    let rows = match frame.kind {
        FrameKind::Status => 3,
        FrameKind::Banner | FrameKind::Headers => {
            hw.clear();
            frame.lines.len()
        }
    };
    for (row, line) in frame.lines.iter().enumerate().take(rows) {
        if frame.kind != FrameKind::Status && line.is_empty() {
            continue;
        }
        if let Err(e) = hw.write_line(row, line.as_str()) {
            warn!("display row {row}: {e}");
        }
    }
}
