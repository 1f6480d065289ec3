//! Frame composer for the 20×4 character LCD.
//!
//! Decides *what* the panel shows each control cycle; the display port only
//! knows how to put lines on glass.
//!
//! ```text
//!   inactive ──(every refresh_ms)──▶ Status
//!   active && !displayed ──────────▶ Banner   (service then marks displayed)
//!   active → inactive ─────────────▶ Headers  (cleared panel, labels only)
//! ```
//!
//! The banner is composed in the same cycle the alarm arms, not at the
//! next refresh boundary.

use core::fmt::Write;

use crate::conditions::ConditionFlags;
use crate::fsm::AlarmState;

pub const WIDTH: usize = 20;
pub const HEIGHT: usize = 4;

pub type Line = heapless::String<WIDTH>;

/// Why a frame was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Periodic readings while the alarm is inactive.
    Status,
    /// One-shot activation banner.
    Banner,
    /// Panel cleared and status labels redrawn after disarm.
    Headers,
}

/// A complete panel image.  Rows are left-aligned, unpadded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub lines: [Line; HEIGHT],
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            lines: Default::default(),
        }
    }

    fn set(&mut self, row: usize, text: &str) {
        let mut line = Line::new();
        // Every fixed string below fits in WIDTH.
        let _ = line.push_str(text);
        self.lines[row] = line;
    }
}

/// Everything the panel reflects, sampled after the alarm core has run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInput {
    pub alarm: AlarmState,
    pub conditions: ConditionFlags,
    pub temperature_c: f32,
    pub gas_detected: bool,
    pub siren: bool,
}

pub struct ScreenComposer {
    refresh_ms: u32,
    accumulated_ms: u32,
    was_active: bool,
}

impl ScreenComposer {
    pub fn new(refresh_ms: u32) -> Self {
        Self {
            refresh_ms,
            accumulated_ms: 0,
            was_active: false,
        }
    }

    /// The labels shown at power-up.
    pub fn boot_frame(&self) -> Frame {
        headers(FrameKind::Headers)
    }

    /// Advance by one control cycle of `elapsed_ms`.
    pub fn update(&mut self, input: &ScreenInput, elapsed_ms: u32) -> Option<Frame> {
        let was_active = core::mem::replace(&mut self.was_active, input.alarm.active);

        if input.alarm.active {
            self.accumulated_ms = 0;
            return (!input.alarm.displayed).then(|| banner(&input.conditions));
        }

        if was_active {
            self.accumulated_ms = 0;
            return Some(headers(FrameKind::Headers));
        }

        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        if self.accumulated_ms < self.refresh_ms {
            return None;
        }
        self.accumulated_ms = 0;
        Some(status(input))
    }
}

fn headers(kind: FrameKind) -> Frame {
    let mut f = Frame::new(kind);
    f.set(0, "Temperature:");
    f.set(1, "Gas:");
    f.set(2, "Alarm:");
    f
}

fn status(input: &ScreenInput) -> Frame {
    let mut f = headers(FrameKind::Status);
    let _ = write!(f.lines[0], "{:.0}'C", input.temperature_c);
    let _ = f.lines[1].push_str(if input.gas_detected {
        "Detected"
    } else {
        "Not Detected"
    });
    let _ = f.lines[2].push_str(if input.siren { "ON" } else { "OFF" });
    f
}

fn banner(conditions: &ConditionFlags) -> Frame {
    let mut f = Frame::new(FrameKind::Banner);
    f.set(0, "ALARM IS ACTIVATED");
    f.set(
        1,
        if conditions.gas_detected {
            "Gas is detected"
        } else {
            "Temp. is too high"
        },
    );
    f.set(2, "Enter a code to");
    f.set(3, "deactivate alarm:");
    f
}
