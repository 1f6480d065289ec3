//! Character-display user interface.

pub mod screen;
