//! Session error types.

use kitchenquest_core::error::DomainError;
use kitchenquest_narration::NarrationError;
use thiserror::Error;

/// Errors returned by quest session operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    /// The run or timer rejected the command.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A directly requested narration failed.
    #[error(transparent)]
    Narration(#[from] NarrationError),

    /// The session actor has shut down.
    #[error("quest session is closed")]
    Closed,
}
