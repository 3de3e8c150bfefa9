//! Kitchen Quest — technique evaluation.
//!
//! The boundary between the quest flow and the photo-grading capability.
//! Responses are validated strictly and replaced by safe defaults rather
//! than partially trusted, and every instruction can be screened for food
//! safety before the photo is graded.

pub mod application;
pub mod domain;
