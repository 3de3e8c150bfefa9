//! Audio output port.
//!
//! Models the single shared speaker the narration coordinator owns. The
//! shape follows the usual buffer-source lifecycle: resume the output,
//! create a source from a decoded buffer, connect it to the destination,
//! start it, and later stop and disconnect it.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::AudioError;

/// Decoded samples ready for playback, stored planar (one `Vec` per channel).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples per second.
    pub sample_rate: u32,
    /// Number of channels, matching `channel_data.len()`.
    pub channels: u16,
    /// Samples normalised to `[-1.0, 1.0)`, one `Vec` per channel.
    pub channel_data: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Number of frames (samples per channel).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.channel_data.first().map_or(0, Vec::len)
    }
}

/// Resolves when a started source plays to its natural end.
///
/// Implementations drop the sender without sending when the source is
/// stopped early, so a receiver error never means natural completion.
pub type PlaybackFinished = oneshot::Receiver<()>;

/// The process-wide audio output.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Resumes the output if it is suspended.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Unavailable`] once the output is closed.
    async fn resume(&self) -> Result<(), AudioError>;

    /// Creates a new, unconnected source that will play `buffer`.
    ///
    /// # Errors
    ///
    /// Returns an [`AudioError`] when the output cannot host a source.
    fn create_source(&self, buffer: AudioBuffer) -> Result<Box<dyn AudioSource>, AudioError>;

    /// Releases the output. Further calls may fail with
    /// [`AudioError::Unavailable`].
    async fn close(&self);
}

/// One playable utterance created by an [`AudioOutput`].
pub trait AudioSource: Send {
    /// Connects the source to the output destination.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Playback`] when the destination refuses it.
    fn connect(&mut self) -> Result<(), AudioError>;

    /// Starts playback and returns the natural-completion notification.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Playback`] when playback cannot begin.
    fn start(&mut self) -> Result<PlaybackFinished, AudioError>;

    /// Stops playback. Stopping a finished or stopped source is a no-op.
    fn stop(&mut self);

    /// Disconnects the source from the destination.
    fn disconnect(&mut self);
}
