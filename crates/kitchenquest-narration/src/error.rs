//! Narration errors.

use kitchenquest_core::error::{AudioError, CapabilityError};
use thiserror::Error;

/// Why a spoken narration could not be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrationError {
    /// The speaker was unavailable, or decoding or playback failed.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Speech synthesis failed after retries.
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] CapabilityError),
}
