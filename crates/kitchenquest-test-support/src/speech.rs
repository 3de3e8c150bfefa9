//! Scripted speech synthesizer.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kitchenquest_core::error::CapabilityError;
use kitchenquest_core::speech::SpeechSynthesizer;

type Response = Result<Option<Vec<u8>>, CapabilityError>;

/// A synthesizer that answers from a queue of scripted responses and
/// falls back to a default once the queue is empty. Every request text
/// is recorded.
#[derive(Debug)]
pub struct ScriptedSynthesizer {
    script: Mutex<VecDeque<(Duration, Response)>>,
    fallback: Response,
    requests: Mutex<Vec<String>>,
}

impl Default for ScriptedSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSynthesizer {
    /// Answers every request with a short tone.
    #[must_use]
    pub fn new() -> Self {
        Self::answering(Ok(Some(Self::tone(2_400))))
    }

    /// Answers every request with no audio.
    #[must_use]
    pub fn silent() -> Self {
        Self::answering(Ok(None))
    }

    fn answering(fallback: Response) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `samples` mono PCM16LE samples of a quiet square wave.
    #[must_use]
    pub fn tone(samples: usize) -> Vec<u8> {
        (0..samples)
            .flat_map(|i| {
                let sample: i16 = if (i / 20).is_multiple_of(2) {
                    1_000
                } else {
                    -1_000
                };
                sample.to_le_bytes()
            })
            .collect()
    }

    /// Queues a response for the next unanswered request.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, response: Response) {
        self.push_delayed(Duration::ZERO, response);
    }

    /// Queues a response that is returned after `delay`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push_delayed(&self, delay: Duration, response: Response) {
        self.script.lock().unwrap().push_back((delay, response));
    }

    /// Returns every requested text in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Option<Vec<u8>>, CapabilityError> {
        self.requests.lock().unwrap().push(text.to_owned());
        let next = self.script.lock().unwrap().pop_front();
        let (delay, response) = next.unwrap_or_else(|| (Duration::ZERO, self.fallback.clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}
