//! Kitchen Quest Core — shared abstractions.
//!
//! This crate defines the traits and types every component of the quest
//! step pipeline depends on: time, aggregates and their events, the error
//! taxonomy, retry policy, and the ports through which external
//! capabilities (speech synthesis, audio output, reward persistence) are
//! injected. It contains no concrete backend code.

pub mod aggregate;
pub mod audio;
pub mod clock;
pub mod error;
pub mod event;
pub mod journal;
pub mod retry;
pub mod reward;
pub mod speech;
