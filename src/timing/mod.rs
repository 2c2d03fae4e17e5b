//! Timing: session clock, display formatting, count-in and metronome drivers

mod clock;
mod countdown;
mod format;
mod metronome;

pub use clock::SessionClock;
pub use countdown::{Countdown, CountdownHooks, CountdownState};
pub use format::{format_position, format_position_signed};
pub use metronome::{Metronome, TickSink};
