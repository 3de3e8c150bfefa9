//! Kitchen Quest — quest sessions.
//!
//! Wires the step pipeline together: a [`QuestSession`] prepares a quest's
//! micro-steps, then sequences one attempt through them, driving the step
//! countdown, photo evaluation, reward reporting, and CDM narration from
//! the events each transition records.

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use session::{QuestSession, QuestSessionHandle, SessionDeps, SessionSnapshot};
pub use telemetry::init_tracing;
