//! Single-speaker narration.

use std::sync::Arc;

use kitchenquest_core::audio::{AudioBuffer, AudioOutput, AudioSource, PlaybackFinished};
use kitchenquest_core::clock::Clock;
use kitchenquest_core::error::AudioError;
use kitchenquest_core::journal::{NarrationEntry, NarrationLog};
use kitchenquest_core::retry::RetryPolicy;
use kitchenquest_core::speech::SpeechSynthesizer;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, error};

use crate::audio_resource::AudioResource;
use crate::error::NarrationError;
use crate::pcm::PcmFormat;
use crate::request::{NarrationOutcome, NarrationRequest, PresentationMode};

struct ActivePlayback {
    ticket: u64,
    source: Box<dyn AudioSource>,
    preempted: oneshot::Sender<()>,
}

impl ActivePlayback {
    fn halt(mut self) {
        self.source.stop();
        self.source.disconnect();
        let _ = self.preempted.send(());
    }
}

#[derive(Default)]
struct Speaker {
    latest_ticket: u64,
    active: Option<ActivePlayback>,
}

/// Logs every narration line and plays spoken ones, one at a time.
///
/// Calls are not queued. Each spoken call claims the speaker when it
/// starts, stopping whatever was playing, and the most recent claim is
/// the only one allowed to start playback. Callers that need lines heard
/// in order await each call before issuing the next.
pub struct NarrationCoordinator {
    mode: PresentationMode,
    format: PcmFormat,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
    log: Arc<dyn NarrationLog>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    audio: Arc<AudioResource>,
    speaker: Mutex<Speaker>,
}

impl NarrationCoordinator {
    /// Creates an interactive coordinator with default retry and PCM format.
    #[must_use]
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        audio: Arc<AudioResource>,
        log: Arc<dyn NarrationLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            mode: PresentationMode::Interactive,
            format: PcmFormat::default(),
            retry: RetryPolicy::default(),
            clock,
            log,
            synthesizer,
            audio,
            speaker: Mutex::new(Speaker::default()),
        }
    }

    /// Sets the presentation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: PresentationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the retry policy for speech synthesis.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the PCM layout of synthesised speech.
    #[must_use]
    pub fn with_format(mut self, format: PcmFormat) -> Self {
        self.format = format;
        self
    }

    /// Presentation mode in effect.
    #[must_use]
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Narrates one line.
    ///
    /// Blank text resolves `Silent` without logging. Anything else is
    /// logged exactly once. Spoken lines outside demo mode then resolve
    /// when playback ends naturally (`Played`), when a newer line takes
    /// the speaker (`Preempted`), or at once when synthesis yields no
    /// audio (`NoAudio`).
    ///
    /// # Errors
    ///
    /// Returns `NarrationError::Audio` when the speaker is unavailable or
    /// playback fails, and `NarrationError::Synthesis` when synthesis
    /// fails after retries. The speaker is left free in both cases.
    pub async fn narrate(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationOutcome, NarrationError> {
        let Some(text) = request.trimmed_text() else {
            return Ok(NarrationOutcome::Silent);
        };

        self.log.record(NarrationEntry {
            text: text.to_owned(),
            speak_aloud: request.speak_aloud,
            logged_at: self.clock.now(),
        });

        if self.mode.is_demo() || !request.speak_aloud {
            return Ok(NarrationOutcome::LogOnly);
        }

        self.speak(text).await.inspect_err(|e| {
            error!(error = %e, "narration playback failed");
        })
    }

    /// Stops whatever is playing and invalidates every pending spoken line.
    pub async fn silence(&self) {
        self.claim_speaker().await;
    }

    async fn speak(&self, text: &str) -> Result<NarrationOutcome, NarrationError> {
        let output = self.audio.acquire().await?;
        let ticket = self.claim_speaker().await;

        let synthesizer = &self.synthesizer;
        let audio = self
            .retry
            .run("synthesize speech", move || synthesizer.synthesize(text))
            .await?;
        let Some(bytes) = audio.filter(|bytes| !bytes.is_empty()) else {
            debug!(ticket, "speech synthesis produced no audio");
            return Ok(NarrationOutcome::NoAudio);
        };
        let buffer = self.format.decode(&bytes)?;

        let installed = self.install(ticket, output.as_ref(), buffer).await?;
        let Some((finished, preempted)) = installed else {
            debug!(ticket, "narration superseded before playback");
            return Ok(NarrationOutcome::Preempted);
        };

        tokio::select! {
            biased;
            _ = preempted => Ok(NarrationOutcome::Preempted),
            result = finished => match result {
                Ok(()) => {
                    self.release_finished(ticket).await;
                    Ok(NarrationOutcome::Played)
                }
                Err(_) => Ok(NarrationOutcome::Preempted),
            },
        }
    }

    /// Takes the next ticket and stops the current playback.
    async fn claim_speaker(&self) -> u64 {
        let mut speaker = self.speaker.lock().await;
        speaker.latest_ticket += 1;
        if let Some(previous) = speaker.active.take() {
            debug!(ticket = previous.ticket, "preempting narration");
            previous.halt();
        }
        speaker.latest_ticket
    }

    /// Starts playback for `ticket` unless a newer claim exists.
    async fn install(
        &self,
        ticket: u64,
        output: &dyn AudioOutput,
        buffer: AudioBuffer,
    ) -> Result<Option<(PlaybackFinished, oneshot::Receiver<()>)>, AudioError> {
        let mut speaker = self.speaker.lock().await;
        if speaker.latest_ticket != ticket {
            return Ok(None);
        }
        if let Some(previous) = speaker.active.take() {
            previous.halt();
        }

        let mut source = output.create_source(buffer)?;
        let finished = match source.connect().and_then(|()| source.start()) {
            Ok(finished) => finished,
            Err(e) => {
                source.stop();
                source.disconnect();
                return Err(e);
            }
        };

        let (preempt_tx, preempt_rx) = oneshot::channel();
        speaker.active = Some(ActivePlayback {
            ticket,
            source,
            preempted: preempt_tx,
        });
        Ok(Some((finished, preempt_rx)))
    }

    async fn release_finished(&self, ticket: u64) {
        let mut speaker = self.speaker.lock().await;
        if let Some(mut finished) = speaker.active.take_if(|active| active.ticket == ticket) {
            finished.source.disconnect();
        }
    }
}

impl std::fmt::Debug for NarrationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationCoordinator")
            .field("mode", &self.mode)
            .field("format", &self.format)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
