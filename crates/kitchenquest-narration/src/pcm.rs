//! Decoding raw synthesised speech.

use kitchenquest_core::audio::AudioBuffer;
use kitchenquest_core::error::AudioError;
use serde::{Deserialize, Serialize};

/// Layout of the 16-bit little-endian PCM produced by speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Samples per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
        }
    }
}

impl PcmFormat {
    /// Splits interleaved PCM16LE into per-channel samples in `[-1.0, 1.0)`.
    /// A trailing partial frame is dropped.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::Decode` for an odd byte count or zero channels.
    pub fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
        if self.channels == 0 {
            return Err(AudioError::Decode("channel count must be at least 1".to_owned()));
        }
        if !bytes.len().is_multiple_of(2) {
            return Err(AudioError::Decode(format!("odd PCM16 byte count: {}", bytes.len())));
        }

        let channels = usize::from(self.channels);
        let frame_count = bytes.len() / 2 / channels;
        let mut channel_data = vec![Vec::with_capacity(frame_count); channels];

        for frame in bytes.chunks_exact(2 * channels) {
            for (channel, sample) in frame.chunks_exact(2).enumerate() {
                let value = i16::from_le_bytes([sample[0], sample[1]]);
                channel_data[channel].push(f32::from(value) / 32_768.0);
            }
        }

        Ok(AudioBuffer {
            sample_rate: self.sample_rate,
            channels: self.channels,
            channel_data,
        })
    }
}
