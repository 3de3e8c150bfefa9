//! Fake audio output.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kitchenquest_core::audio::{AudioBuffer, AudioOutput, AudioSource, PlaybackFinished};
use kitchenquest_core::error::AudioError;
use tokio::sync::oneshot;

/// Everything that happened to a [`FakeAudioOutput`], in order. Sources
/// are numbered from 1 in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    /// The output was resumed.
    Resumed,
    /// A source was created.
    Created(u64),
    /// A source was connected.
    Connected(u64),
    /// A source started playing.
    Started(u64),
    /// A source was stopped before finishing.
    Stopped(u64),
    /// A source was disconnected.
    Disconnected(u64),
    /// The output was closed.
    Closed,
}

#[derive(Debug, Default)]
struct FakeAudioState {
    next_source: u64,
    closed: bool,
    fail_next_start: bool,
    events: Vec<AudioEvent>,
    started: Vec<u64>,
    playing: BTreeMap<u64, oneshot::Sender<()>>,
}

/// An audio output that never makes a sound. Sources play until the test
/// calls [`FakeAudioOutput::finish_playing`] or they are stopped.
#[derive(Debug, Clone, Default)]
pub struct FakeAudioOutput {
    state: Arc<Mutex<FakeAudioState>>,
}

impl FakeAudioOutput {
    /// Creates an open output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<AudioEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Ids of every source that was started, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn started(&self) -> Vec<u64> {
        self.state.lock().unwrap().started.clone()
    }

    /// Ids of sources currently playing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn playing(&self) -> Vec<u64> {
        self.state.lock().unwrap().playing.keys().copied().collect()
    }

    /// Lets every playing source reach its natural end.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn finish_playing(&self) {
        let finished = std::mem::take(&mut self.state.lock().unwrap().playing);
        for (_, done) in finished {
            let _ = done.send(());
        }
    }

    /// Makes the next `start` call fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_next_start(&self) {
        self.state.lock().unwrap().fail_next_start = true;
    }
}

#[async_trait]
impl AudioOutput for FakeAudioOutput {
    async fn resume(&self) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(AudioError::Unavailable);
        }
        state.events.push(AudioEvent::Resumed);
        Ok(())
    }

    fn create_source(&self, _buffer: AudioBuffer) -> Result<Box<dyn AudioSource>, AudioError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(AudioError::Unavailable);
        }
        state.next_source += 1;
        let id = state.next_source;
        state.events.push(AudioEvent::Created(id));
        Ok(Box::new(FakeSource {
            id,
            state: Arc::clone(&self.state),
        }))
    }

    async fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        state.playing.clear();
        state.events.push(AudioEvent::Closed);
    }
}

struct FakeSource {
    id: u64,
    state: Arc<Mutex<FakeAudioState>>,
}

impl AudioSource for FakeSource {
    fn connect(&mut self) -> Result<(), AudioError> {
        self.state
            .lock()
            .unwrap()
            .events
            .push(AudioEvent::Connected(self.id));
        Ok(())
    }

    fn start(&mut self) -> Result<PlaybackFinished, AudioError> {
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.fail_next_start) {
            return Err(AudioError::Playback("fake start failure".to_owned()));
        }
        let (done_tx, done_rx) = oneshot::channel();
        state.playing.insert(self.id, done_tx);
        state.started.push(self.id);
        state.events.push(AudioEvent::Started(self.id));
        Ok(done_rx)
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.playing.remove(&self.id);
        state.events.push(AudioEvent::Stopped(self.id));
    }

    fn disconnect(&mut self) {
        self.state
            .lock()
            .unwrap()
            .events
            .push(AudioEvent::Disconnected(self.id));
    }
}
