//! Domain model for quest runs.

pub mod aggregates;
pub mod events;
pub mod fallback;
pub mod micro_step;
pub mod quest;
