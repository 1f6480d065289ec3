//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It contains the latest sensor snapshot, the evaluated
//! condition flags, indicator command outputs, timing information,
//! configuration and the lockout flag.

use crate::conditions::ConditionFlags;
use crate::config::AlarmConfig;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by sensor hub)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every input the alarm evaluates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Temperature sensor reading (°C).
    pub temperature_c: f32,
    /// Averaged gas concentration (ppm).
    pub gas_ppm: f32,
    /// True if the gas concentration exceeds the detection threshold.
    pub gas_detected: bool,
    /// Hardware self-test button is held down.
    pub manual_test: bool,
}

// ---------------------------------------------------------------------------
// Indicator commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request indicator actions.
/// The application service applies these to the output port each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorCommands {
    /// Siren sounding.
    pub siren: bool,
    /// Strobe half-period in milliseconds (0 = strobe off).
    pub strobe_half_period_ms: u32,
    /// Alarm LED lit.
    pub alarm_led: bool,
    /// Incorrect-code LED lit.
    pub incorrect_code_led: bool,
    /// System-blocked LED lit.
    pub system_blocked_led: bool,
}

impl IndicatorCommands {
    /// All indicators off: safe default.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Duration of one tick in seconds (inverse of control loop frequency).
    pub tick_period_secs: f32,

    // -- Inputs --
    /// Latest sensor readings.  Updated before each FSM tick.
    pub sensors: SensorSnapshot,
    /// Condition flags from the evaluator.  Updated before each FSM tick.
    pub conditions: ConditionFlags,

    // -- Outputs --
    /// Commands to be applied to indicators after the FSM tick.
    pub commands: IndicatorCommands,
    /// Last non-zero strobe period of the current arming episode.
    pub latched_strobe_ms: u32,

    // -- Configuration --
    pub config: AlarmConfig,

    // -- Lockout --
    /// Code entry disabled after too many wrong codes.  Never cleared in-core.
    pub blocked: bool,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            tick_period_secs: config.control_loop_interval_ms as f32 / 1000.0,
            sensors: SensorSnapshot::default(),
            conditions: ConditionFlags::default(),
            commands: IndicatorCommands::all_off(),
            latched_strobe_ms: 0,
            config,
            blocked: false,
        }
    }

    /// Seconds elapsed since the current state was entered.
    pub fn secs_in_state(&self) -> f32 {
        self.ticks_in_state as f32 * self.tick_period_secs
    }
}
