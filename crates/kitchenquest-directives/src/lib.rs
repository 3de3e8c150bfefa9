//! Kitchen Quest — directive parsing.
//!
//! Micro-step instructions arrive with machine-readable tokens embedded in
//! the prose:
//!
//! - `[ACTION: SET_TIMER | TIME: 3m | LABEL: "BROWN THE MEAT"]`
//! - `[HEAT: 🔥🔥 (Steady)]` or `[HEAT: N/A]`
//!
//! [`parse`] pulls at most one of each out and returns the display text
//! with every token removed and punctuation tidied.

mod cleanup;
pub mod directive;
pub mod parser;

pub use directive::{HeatDirective, HeatLevel, ParsedInstruction, TimerDirective};
pub use parser::parse;
