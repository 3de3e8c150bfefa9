//! Kitchen Quest — quest runs.
//!
//! Responsible for turning a selected recipe quest into a flat list of
//! beginner micro-steps and sequencing a single attempt through them:
//! advancing, skipping, recording evaluation bonuses, completing, and
//! abandoning.

pub mod application;
pub mod domain;
