//! Mock hardware adapter for integration tests.
//!
//! Sensor readings and key releases are scripted; every indicator call is
//! recorded so tests can assert on the full command history without
//! touching real GPIO registers.  The display is a plain 20×4 text buffer.

use std::collections::VecDeque;

use firealarm::app::events::AppEvent;
use firealarm::app::ports::{DisplayPort, EventSink, IndicatorPort, KeypadPort, SensorPort};
use firealarm::error::OutputError;
use firealarm::fsm::context::SensorSnapshot;

// ── Indicator call record ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCall {
    Siren(bool),
    Strobe(bool),
    AlarmLed(bool),
    IncorrectCodeLed(bool),
    SystemBlockedLed(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub snapshot: SensorSnapshot,
    pub keys: VecDeque<char>,
    pub calls: Vec<IndicatorCall>,
    pub panel: [String; 4],
    pub clears: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot {
                temperature_c: 22.0,
                ..SensorSnapshot::default()
            },
            keys: VecDeque::new(),
            calls: Vec::new(),
            panel: Default::default(),
            clears: 0,
        }
    }

    /// Queue key releases, one per control cycle.
    pub fn type_keys(&mut self, keys: &str) {
        self.keys.extend(keys.chars());
    }

    fn last_level(&self, pick: fn(&IndicatorCall) -> Option<bool>) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                IndicatorCall::AllOff => Some(false),
                other => pick(other),
            })
            .unwrap_or(false)
    }

    pub fn siren_on(&self) -> bool {
        self.last_level(|c| match c {
            IndicatorCall::Siren(on) => Some(*on),
            _ => None,
        })
    }

    pub fn alarm_led_on(&self) -> bool {
        self.last_level(|c| match c {
            IndicatorCall::AlarmLed(on) => Some(*on),
            _ => None,
        })
    }

    pub fn incorrect_code_led_on(&self) -> bool {
        self.last_level(|c| match c {
            IndicatorCall::IncorrectCodeLed(on) => Some(*on),
            _ => None,
        })
    }

    pub fn system_blocked_led_on(&self) -> bool {
        self.last_level(|c| match c {
            IndicatorCall::SystemBlockedLed(on) => Some(*on),
            _ => None,
        })
    }

    /// Strobe levels written so far, oldest first.
    pub fn strobe_trace(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IndicatorCall::Strobe(lit) => Some(*lit),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

impl KeypadPort for MockHardware {
    fn poll_released_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }
}

impl IndicatorPort for MockHardware {
    fn set_siren(&mut self, on: bool) {
        self.calls.push(IndicatorCall::Siren(on));
    }

    fn set_strobe(&mut self, lit: bool) {
        self.calls.push(IndicatorCall::Strobe(lit));
    }

    fn set_alarm_led(&mut self, on: bool) {
        self.calls.push(IndicatorCall::AlarmLed(on));
    }

    fn set_incorrect_code_led(&mut self, on: bool) {
        self.calls.push(IndicatorCall::IncorrectCodeLed(on));
    }

    fn set_system_blocked_led(&mut self, on: bool) {
        self.calls.push(IndicatorCall::SystemBlockedLed(on));
    }

    fn all_off(&mut self) {
        self.calls.push(IndicatorCall::AllOff);
    }
}

impl DisplayPort for MockHardware {
    fn clear(&mut self) {
        self.clears += 1;
        self.panel = Default::default();
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), OutputError> {
        let slot = self.panel.get_mut(row).ok_or(OutputError::RowOutOfRange)?;
        *slot = text.to_string();
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
