//! Error taxonomy shared by every component.

use thiserror::Error;

/// State-machine and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A quest was initialised with no steps.
    #[error("quest has no steps")]
    EmptyQuest,

    /// An operation was issued in a state that does not accept it.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// Human-readable description of the current state.
        state: String,
    },

    /// Input failed domain validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// Shorthand for building an [`DomainError::InvalidState`].
    #[must_use]
    pub fn invalid_state(operation: &'static str, state: impl Into<String>) -> Self {
        Self::InvalidState {
            operation,
            state: state.into(),
        }
    }
}

/// Failure of an external generative capability call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// Upstream is temporarily over capacity. The only retryable signature.
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// The call failed outright.
    #[error("capability call failed: {0}")]
    Failed(String),

    /// The call returned something that could not be understood.
    #[error("malformed capability response: {0}")]
    Malformed(String),
}

impl CapabilityError {
    /// Returns true when the error is worth retrying with backoff.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Failure of the audio output resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The audio subsystem was never initialised (or was closed).
    #[error("audio output not initialized")]
    Unavailable,

    /// Synthesised bytes could not be decoded into a playable buffer.
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// The output refused to create, connect, or start a source.
    #[error("audio playback failed: {0}")]
    Playback(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_transient() {
        assert!(CapabilityError::Unavailable("busy".into()).is_transient());
        assert!(!CapabilityError::Failed("boom".into()).is_transient());
        assert!(!CapabilityError::Malformed("junk".into()).is_transient());
    }

    #[test]
    fn test_invalid_state_message_names_operation_and_state() {
        let err = DomainError::invalid_state("advance", "complete");
        assert_eq!(err.to_string(), "cannot advance while complete");
    }
}
