//! Speech synthesis port.

use async_trait::async_trait;

use crate::error::CapabilityError;

/// External text-to-speech capability.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesises `text` into raw 16-bit little-endian PCM.
    ///
    /// `Ok(None)` means the capability produced no audio, which callers
    /// treat as benign.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityError`]; only `Unavailable` is worth retrying.
    async fn synthesize(&self, text: &str) -> Result<Option<Vec<u8>>, CapabilityError>;
}
