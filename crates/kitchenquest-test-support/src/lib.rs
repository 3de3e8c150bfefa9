//! Shared test fakes and utilities for the Kitchen Quest step pipeline.

mod audio;
mod clock;
mod journal;
mod reward;
mod speech;

pub use audio::{AudioEvent, FakeAudioOutput};
pub use clock::FixedClock;
pub use journal::RecordingNarrationLog;
pub use reward::RecordingRewardSink;
pub use speech::ScriptedSynthesizer;
