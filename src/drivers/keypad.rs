//! 4×4 matrix keypad scanner.
//!
//! Rows are outputs idling HIGH, columns are inputs with pull-ups.  A scan
//! drives one row LOW at a time and looks for a LOW column.  A key is
//! reported once, on release, which matches the way the code accumulator
//! consumes keys.
//!
//! ```text
//!        C0  C1  C2  C3
//!   R0    1   2   3   A
//!   R1    4   5   6   B
//!   R2    7   8   9   C
//!   R3    *   0   #   D
//! ```
//!
//! Generic over `embedded-hal` pins so it runs unchanged against
//! [`GpioPin`](super::gpio::GpioPin) on the board and mock pins in tests.

use embedded_hal::digital::{InputPin, OutputPin};
use log::trace;

use crate::error::{Error, OutputError, SensorError};

pub const ROWS: usize = 4;
pub const COLS: usize = 4;

pub const KEY_MAP: [[char; COLS]; ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

pub struct MatrixKeypad<R, C> {
    rows: [R; ROWS],
    cols: [C; COLS],
    held: Option<char>,
}

impl<R: OutputPin, C: InputPin> MatrixKeypad<R, C> {
    pub fn new(rows: [R; ROWS], cols: [C; COLS]) -> Self {
        Self {
            rows,
            cols,
            held: None,
        }
    }

    /// Scan once and return the key that was released since the last poll.
    pub fn poll_released(&mut self) -> Result<Option<char>, Error> {
        let pressed = self.scan()?;
        match (self.held, pressed) {
            (Some(prev), None) => {
                self.held = None;
                trace!("keypad: '{prev}' released");
                Ok(Some(prev))
            }
            (_, Some(key)) => {
                // A second key pressed before the first is released
                // replaces it; only the last one held is reported.
                self.held = Some(key);
                Ok(None)
            }
            (None, None) => Ok(None),
        }
    }

    /// Key currently held down, as of the last poll.
    pub fn held(&self) -> Option<char> {
        self.held
    }

    /// First pressed key in row-major order, if any.
    pub fn scan(&mut self) -> Result<Option<char>, Error> {
        for r in 0..ROWS {
            self.rows[r]
                .set_low()
                .map_err(|_| OutputError::GpioWriteFailed)?;
            let hit = self.pressed_column();
            self.rows[r]
                .set_high()
                .map_err(|_| OutputError::GpioWriteFailed)?;
            if let Some(c) = hit? {
                return Ok(Some(KEY_MAP[r][c]));
            }
        }
        Ok(None)
    }

    fn pressed_column(&mut self) -> Result<Option<usize>, Error> {
        for (c, col) in self.cols.iter_mut().enumerate() {
            if col.is_low().map_err(|_| SensorError::GpioReadFailed)? {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }
}
