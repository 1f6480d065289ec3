//! Alarm condition evaluator.
//!
//! Runs **every tick before the FSM** and turns the latest sensor snapshot
//! into two independent condition flags.  The FSM only ever looks at the
//! flags, never at raw readings.
//!
//! ## Flags vs detector state
//!
//! | Output              | Manual test button | Used by                   |
//! |---------------------|--------------------|---------------------------|
//! | [`ConditionFlags`]  | forces both `true` | arming state machine      |
//! | [`DetectorState`]   | ignored            | indicators and telemetry  |
//!
//! The evaluator is pure with respect to the alarm: it holds the last
//! result only so it can log edges.

use log::{info, warn};

use crate::config::AlarmConfig;
use crate::fsm::context::SensorSnapshot;

/// Condition flags consumed by the arming state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionFlags {
    /// Temperature strictly above the configured limit (or self-test).
    pub over_temperature: bool,
    /// Gas sensor reports detection (or self-test).
    pub gas_detected: bool,
}

impl ConditionFlags {
    /// True if either condition is raised.
    pub fn any(&self) -> bool {
        self.over_temperature || self.gas_detected
    }
}

/// Raw detector outputs, without the self-test override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorState {
    pub over_temperature: bool,
    pub gas: bool,
}

/// Combine one cycle of readings into condition flags.
///
/// Exactly-at-limit is not an alarm.  A held test button forces both flags
/// regardless of the real readings.
pub fn evaluate(
    temperature_c: f32,
    gas_detected_raw: bool,
    manual_test_active: bool,
    temperature_limit_c: f32,
) -> ConditionFlags {
    if manual_test_active {
        return ConditionFlags {
            over_temperature: true,
            gas_detected: true,
        };
    }
    ConditionFlags {
        over_temperature: temperature_c > temperature_limit_c,
        gas_detected: gas_detected_raw,
    }
}

/// Strobe half-period (ms) for the given flags; `0` means no strobe.
pub fn strobe_period_ms(flags: &ConditionFlags, config: &AlarmConfig) -> u32 {
    match (flags.gas_detected, flags.over_temperature) {
        (true, true) => config.strobe_both_ms,
        (true, false) => config.strobe_gas_ms,
        (false, true) => config.strobe_over_temp_ms,
        (false, false) => 0,
    }
}

/// Stateful wrapper that applies the configured limit and logs edges.
pub struct ConditionEvaluator {
    temperature_limit_c: f32,
    flags: ConditionFlags,
    detectors: DetectorState,
}

impl ConditionEvaluator {
    pub fn new(config: &AlarmConfig) -> Self {
        Self {
            temperature_limit_c: config.temperature_limit_c,
            flags: ConditionFlags::default(),
            detectors: DetectorState::default(),
        }
    }

    /// Evaluate the snapshot and return the condition flags for this cycle.
    pub fn evaluate(&mut self, snap: &SensorSnapshot) -> ConditionFlags {
        let flags = evaluate(
            snap.temperature_c,
            snap.gas_detected,
            snap.manual_test,
            self.temperature_limit_c,
        );

        self.detectors = DetectorState {
            over_temperature: snap.temperature_c > self.temperature_limit_c,
            gas: snap.gas_detected,
        };

        Self::log_edge("over-temperature", self.flags.over_temperature, flags.over_temperature);
        Self::log_edge("gas", self.flags.gas_detected, flags.gas_detected);
        if snap.manual_test {
            log::debug!("self-test button held, conditions forced");
        }

        self.flags = flags;
        flags
    }

    /// Flags from the most recent evaluation.
    pub fn flags(&self) -> ConditionFlags {
        self.flags
    }

    /// Detector state from the most recent evaluation.
    pub fn detectors(&self) -> DetectorState {
        self.detectors
    }

    fn log_edge(name: &str, was: bool, now: bool) {
        match (was, now) {
            (false, true) => warn!("CONDITION RAISED: {name}"),
            (true, false) => info!("CONDITION CLEARED: {name}"),
            _ => {}
        }
    }
}
