//! Alarm controller: the single owner of all arming state.
//!
//! One call to [`AlarmController::tick`] is one control cycle, always in
//! this order:
//!
//! ```text
//!  SensorSnapshot ──▶ ConditionEvaluator ──▶ Fsm (arm) ──▶ CodeEntry ──▶ CycleReport
//!                                             ▲               │
//!                                             └── disarm ◀────┘ (match)
//! ```
//!
//! Nothing here touches hardware.  Inputs arrive already sampled and the
//! outputs are plain values for the service layer to apply.

use log::{error, info};

use crate::code_entry::{CodeEntry, KeyOutcome, StoredCode};
use crate::conditions::{ConditionEvaluator, ConditionFlags, DetectorState};
use crate::config::{AlarmConfig, ConfigError};
use crate::fsm::context::{FsmContext, IndicatorCommands, SensorSnapshot};
use crate::fsm::states::build_state_table;
use crate::fsm::{AlarmState, Fsm, StateId};

/// Everything one control cycle produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub conditions: ConditionFlags,
    pub detectors: DetectorState,
    pub alarm: AlarmState,
    pub commands: IndicatorCommands,
    /// Outcome of the key consumed this cycle, if there was one.
    pub key: Option<KeyOutcome>,
    /// Transition taken by the FSM update, before the key was consumed.
    pub step: Option<(StateId, StateId)>,
    /// Transition caused by the consumed key (a disarm).  With a one-key
    /// code this can follow an arming `step` in the same cycle.
    pub key_transition: Option<(StateId, StateId)>,
}

/// Owns the arming FSM, the condition evaluator and the code accumulator.
pub struct AlarmController {
    fsm: Fsm,
    ctx: FsmContext,
    evaluator: ConditionEvaluator,
    code_entry: CodeEntry,
}

impl AlarmController {
    /// Build a controller from validated configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: AlarmConfig) -> Result<Self, ConfigError> {
        let stored = StoredCode::from_config(&config)?;
        let code_entry = CodeEntry::new(stored, config.failure_threshold);
        let evaluator = ConditionEvaluator::new(&config);
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Ok(Self {
            fsm,
            ctx,
            evaluator,
            code_entry,
        })
    }

    /// Run the initial state's entry action (all indicators off).
    pub fn start(&mut self) {
        self.fsm.start(&mut self.ctx);
        self.sync_code_indicators();
    }

    /// Run one control cycle.
    pub fn tick(&mut self, snap: &SensorSnapshot, key: Option<char>) -> CycleReport {
        let prev = self.fsm.current_state();

        // 1. Evaluate conditions
        self.ctx.sensors = *snap;
        self.ctx.conditions = self.evaluator.evaluate(snap);

        // 2. Arming state machine
        self.fsm.tick(&mut self.ctx);
        let stepped = self.fsm.current_state();

        // 3. Code entry
        let outcome = key.map(|k| self.consume_key(k));

        // 4. Indicators owned by the code path
        self.sync_code_indicators();

        let now = self.fsm.current_state();
        CycleReport {
            conditions: self.ctx.conditions,
            detectors: self.evaluator.detectors(),
            alarm: self.alarm_state(),
            commands: self.ctx.commands,
            key: outcome,
            step: (stepped != prev).then_some((prev, stepped)),
            key_transition: (now != stepped).then_some((stepped, now)),
        }
    }

    /// The display layer has shown the activation banner.
    ///
    /// Returns `true` if this fired the one-shot latch.
    pub fn mark_displayed(&mut self) -> bool {
        if self.fsm.current_state() != StateId::ActiveUndisplayed {
            return false;
        }
        self.fsm
            .force_transition(StateId::ActiveDisplayed, &mut self.ctx);
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn alarm_state(&self) -> AlarmState {
        let state = self.fsm.current_state();
        AlarmState {
            active: state.is_active(),
            blocked: self.ctx.blocked,
            displayed: state == StateId::ActiveDisplayed,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn conditions(&self) -> ConditionFlags {
        self.ctx.conditions
    }

    pub fn detectors(&self) -> DetectorState {
        self.evaluator.detectors()
    }

    pub fn commands(&self) -> IndicatorCommands {
        self.ctx.commands
    }

    /// Latest sensor snapshot fed to [`tick`](Self::tick).
    pub fn sensors(&self) -> SensorSnapshot {
        self.ctx.sensors
    }

    /// Incorrect submissions since power-up.
    pub fn failures(&self) -> u32 {
        self.code_entry.failures()
    }

    pub fn incorrect_code(&self) -> bool {
        self.code_entry.incorrect_code()
    }

    pub fn code_buffer(&self) -> &[char] {
        self.code_entry.buffer()
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.ctx.config
    }

    /// Seconds spent in the current state.
    pub fn secs_in_state(&self) -> f32 {
        self.ctx.secs_in_state()
    }

    // ── Internal ──────────────────────────────────────────────

    fn consume_key(&mut self, key: char) -> KeyOutcome {
        let outcome = self.code_entry.on_key_released(key, self.alarm_state());
        match outcome {
            KeyOutcome::Accepted => {
                info!("Alarm disarmed by code");
                self.fsm.force_transition(StateId::Idle, &mut self.ctx);
            }
            KeyOutcome::Rejected { lockout: true, .. } if !self.ctx.blocked => {
                error!(
                    "SYSTEM BLOCKED after {} incorrect codes",
                    self.code_entry.failures()
                );
                self.ctx.blocked = true;
            }
            _ => {}
        }
        outcome
    }

    fn sync_code_indicators(&mut self) {
        self.ctx.commands.incorrect_code_led = self.code_entry.incorrect_code();
        self.ctx.commands.system_blocked_led = self.ctx.blocked;
    }
}
