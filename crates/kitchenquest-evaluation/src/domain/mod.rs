//! Evaluation results and food-safety reports.

pub mod evaluation;
pub mod safety;
