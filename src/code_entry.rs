//! Keypad code entry: accumulator, stored code and lockout counter.
//!
//! Keys are only accepted while the alarm is active and the keypad is not
//! locked out.  Once `N` keys are buffered the attempt is compared against
//! the stored code in order.
//!
//! ```text
//!            key (buffer < N)
//!   ┌───────┐ ───────────────┐
//!   │ Entry │◀───────────────┘
//!   └───┬───┘
//!       │ N keys
//!       ├── match ──────▶ Accepted (caller disarms)
//!       └── mismatch ───▶ Incorrect ──[#, #]──▶ Entry
//!                            │
//!                   failures >= T ──▶ blocked (no way back in-core)
//! ```
//!
//! The failure count is never reset by a successful code: wrong attempts
//! accumulate across arming episodes for the life of the process.

use log::{debug, info, warn};

use crate::config::{AlarmConfig, ConfigError, MAX_CODE_LEN};
use crate::fsm::AlarmState;

/// Key that makes up the abort gesture.
pub const ABORT_KEY: char = '#';
/// Consecutive presses of [`ABORT_KEY`] needed to abort a failed attempt.
pub const ABORT_PRESSES: u8 = 2;

// ---------------------------------------------------------------------------
// Stored code
// ---------------------------------------------------------------------------

/// The immutable disarm code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCode {
    chars: heapless::Vec<char, MAX_CODE_LEN>,
}

impl StoredCode {
    pub fn new(code: &str) -> Result<Self, ConfigError> {
        let mut chars = heapless::Vec::new();
        for c in code.chars() {
            chars
                .push(c)
                .map_err(|_| ConfigError::ValidationFailed("stored_code too long"))?;
        }
        if chars.is_empty() {
            return Err(ConfigError::ValidationFailed("stored_code must not be empty"));
        }
        Ok(Self { chars })
    }

    pub fn from_config(config: &AlarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.stored_code.as_str())
    }

    /// Number of keys in a complete attempt.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Element-by-element comparison.
    pub fn matches(&self, attempt: &[char]) -> bool {
        self.chars.as_slice() == attempt
    }
}

// ---------------------------------------------------------------------------
// Lockout counter
// ---------------------------------------------------------------------------

/// Counts incorrect submissions.  Monotonic: there is no reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutCounter {
    failures: u32,
    threshold: u32,
}

impl LockoutCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            failures: 0,
            threshold,
        }
    }

    /// Record one incorrect submission.  Returns `true` once the threshold
    /// has been reached.
    pub fn record_failure(&mut self) -> bool {
        self.failures = self.failures.saturating_add(1);
        self.is_tripped()
    }

    pub fn is_tripped(&self) -> bool {
        self.failures >= self.threshold
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// What a single key release did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Alarm inactive or keypad blocked; key dropped.
    Ignored,
    /// Key appended; `len` keys now buffered.
    Buffered { len: usize },
    /// Complete attempt matched the stored code.
    Accepted,
    /// Complete attempt did not match.
    Rejected {
        failures: u32,
        /// This rejection reached the lockout threshold.
        lockout: bool,
    },
    /// Waiting for the rest of the abort gesture.
    AbortPending,
    /// Abort gesture completed; entry re-armed.
    Aborted,
    /// Key dropped while a failed attempt is awaiting abort.
    Discarded,
}

/// Collects keypad releases into a fixed-length attempt.
pub struct CodeEntry {
    stored: StoredCode,
    buffer: heapless::Vec<char, MAX_CODE_LEN>,
    incorrect: bool,
    abort_presses: u8,
    lockout: LockoutCounter,
}

impl CodeEntry {
    pub fn new(stored: StoredCode, failure_threshold: u32) -> Self {
        Self {
            stored,
            buffer: heapless::Vec::new(),
            incorrect: false,
            abort_presses: 0,
            lockout: LockoutCounter::new(failure_threshold),
        }
    }

    /// Feed one released key.  `alarm` is the state *before* this key.
    pub fn on_key_released(&mut self, key: char, alarm: AlarmState) -> KeyOutcome {
        if !alarm.active || alarm.blocked {
            debug!("key '{key}' ignored (active={}, blocked={})", alarm.active, alarm.blocked);
            return KeyOutcome::Ignored;
        }

        if self.incorrect {
            return self.on_abort_candidate(key);
        }

        // Invariant: len < N <= MAX_CODE_LEN before the push.
        let _ = self.buffer.push(key);
        if self.buffer.len() < self.stored.len() {
            debug!("code key {} of {}", self.buffer.len(), self.stored.len());
            return KeyOutcome::Buffered {
                len: self.buffer.len(),
            };
        }

        let matched = self.stored.matches(&self.buffer);
        self.buffer.clear();

        if matched {
            info!("Code accepted");
            return KeyOutcome::Accepted;
        }

        self.incorrect = true;
        self.abort_presses = 0;
        let lockout = self.lockout.record_failure();
        warn!(
            "Incorrect code ({} of {} allowed)",
            self.lockout.failures(),
            self.lockout.threshold()
        );
        KeyOutcome::Rejected {
            failures: self.lockout.failures(),
            lockout,
        }
    }

    /// Keys currently buffered for the attempt in progress.
    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    /// A wrong attempt is awaiting the abort gesture.
    pub fn incorrect_code(&self) -> bool {
        self.incorrect
    }

    /// Total incorrect submissions since power-up.
    pub fn failures(&self) -> u32 {
        self.lockout.failures()
    }

    pub fn lockout(&self) -> &LockoutCounter {
        &self.lockout
    }

    /// Number of keys in a complete attempt.
    pub fn code_length(&self) -> usize {
        self.stored.len()
    }

    // ── Internal ──────────────────────────────────────────────────

    fn on_abort_candidate(&mut self, key: char) -> KeyOutcome {
        if key != ABORT_KEY {
            self.abort_presses = 0;
            return KeyOutcome::Discarded;
        }

        self.abort_presses += 1;
        if self.abort_presses < ABORT_PRESSES {
            return KeyOutcome::AbortPending;
        }

        self.abort_presses = 0;
        self.buffer.clear();
        self.incorrect = false;
        info!("Failed attempt cleared, code entry re-armed");
        KeyOutcome::Aborted
    }
}
