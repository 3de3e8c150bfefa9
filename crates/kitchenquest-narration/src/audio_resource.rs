//! Handle to the process-wide audio output.

use std::sync::Arc;

use kitchenquest_core::audio::AudioOutput;
use kitchenquest_core::error::AudioError;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Explicit init, acquire, and release lifecycle around the single audio
/// output. Only the narration coordinator acquires it.
pub struct AudioResource {
    output: Mutex<Option<Arc<dyn AudioOutput>>>,
}

impl AudioResource {
    /// A handle whose output has not been initialised yet.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            output: Mutex::new(None),
        }
    }

    /// A handle around an already-initialised output.
    #[must_use]
    pub fn new(output: Arc<dyn AudioOutput>) -> Self {
        Self {
            output: Mutex::new(Some(output)),
        }
    }

    /// Installs the output, replacing any previous one.
    pub async fn init(&self, output: Arc<dyn AudioOutput>) {
        *self.output.lock().await = Some(output);
        debug!("audio output initialized");
    }

    /// Returns true once an output has been installed and not released.
    pub async fn is_initialized(&self) -> bool {
        self.output.lock().await.is_some()
    }

    /// Returns the output, resumed and ready for a new source.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::Unavailable` before `init` or after `release`,
    /// or whatever error resuming the output produced.
    pub async fn acquire(&self) -> Result<Arc<dyn AudioOutput>, AudioError> {
        let output = self.output.lock().await.clone();
        let Some(output) = output else {
            error!("audio output requested before initialization");
            return Err(AudioError::Unavailable);
        };
        output.resume().await?;
        Ok(output)
    }

    /// Closes and forgets the output.
    pub async fn release(&self) {
        let output = self.output.lock().await.take();
        if let Some(output) = output {
            output.close().await;
            debug!("audio output released");
        }
    }
}

impl std::fmt::Debug for AudioResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioResource").finish_non_exhaustive()
    }
}
