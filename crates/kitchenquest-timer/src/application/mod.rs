//! Tick scheduling for the countdown.

pub mod driver;
pub mod tick_source;
