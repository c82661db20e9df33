//! Built-in subscription sources.
//!
//! - [`terminal_events`] / [`TerminalEvents`]: keyboard, mouse, resize and
//!   focus events from the terminal.
//! - [`Every`] / [`After`]: repeating and one-shot timers.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
