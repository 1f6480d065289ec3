//! Strobe flash pattern.
//!
//! The alarm core only decides the strobe *half-period* (0 = off).  This
//! engine turns that into an on/off square wave from elapsed time.  The
//! service calls `tick()` once per control cycle and writes the result to
//! the strobe output.
//!
//! | Cause             | Half-period | Rate   |
//! |-------------------|-------------|--------|
//! | Gas only          | 1000 ms     | 0.5 Hz |
//! | Over-temperature  | 500 ms      | 1 Hz   |
//! | Both              | 100 ms      | 5 Hz   |
//!
//! A period change restarts the wave in the ON phase so a more urgent
//! pattern shows immediately.

pub struct StrobePattern {
    half_period_ms: u32,
    phase_ms: u64,
}

impl Default for StrobePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl StrobePattern {
    pub fn new() -> Self {
        Self {
            half_period_ms: 0,
            phase_ms: 0,
        }
    }

    /// Select the half-period.  0 turns the strobe off.
    pub fn set_half_period(&mut self, half_period_ms: u32) {
        if half_period_ms != self.half_period_ms {
            self.half_period_ms = half_period_ms;
            self.phase_ms = 0;
        }
    }

    /// Advance by `delta_ms` and return whether the lamp is lit.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if self.half_period_ms == 0 {
            return false;
        }
        let lit = self.is_lit();
        // Phase runs in u64 so any u32 period or step wraps without overflow.
        let cycle = 2 * u64::from(self.half_period_ms);
        self.phase_ms = (self.phase_ms + u64::from(delta_ms)) % cycle;
        lit
    }

    fn is_lit(&self) -> bool {
        self.phase_ms < u64::from(self.half_period_ms)
    }
}
