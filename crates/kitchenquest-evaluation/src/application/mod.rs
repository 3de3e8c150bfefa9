//! Evaluator ports and the photo review flow.

pub mod evaluators;
pub mod review;
