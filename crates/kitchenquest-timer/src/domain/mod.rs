//! Countdown state machine.

pub mod countdown;
