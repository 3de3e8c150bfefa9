//! Kitchen Quest — step countdown.
//!
//! A pure countdown state machine plus the tick source that drives it once
//! per second. A timer is rebuilt, never carried over, whenever the current
//! step changes.

pub mod application;
pub mod domain;
