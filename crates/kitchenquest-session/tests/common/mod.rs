//! Shared test helpers for quest session integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kitchenquest_core::error::CapabilityError;
use kitchenquest_core::retry::RetryPolicy;
use kitchenquest_evaluation::application::evaluators::TechniqueEvaluator;
use kitchenquest_evaluation::domain::evaluation::{
    EvaluationResult, Photo, Rank, RawEvaluation, StepContext,
};
use kitchenquest_narration::{AudioResource, PresentationMode};
use kitchenquest_quest::application::decomposition::QuestDecomposer;
use kitchenquest_quest::domain::micro_step::{MicroStepDraft, MiniGameType};
use kitchenquest_quest::domain::quest::{Quest, QuestStepOutline};
use kitchenquest_session::{SessionConfig, SessionDeps};
use kitchenquest_test_support::{
    FakeAudioOutput, FixedClock, RecordingNarrationLog, RecordingRewardSink, ScriptedSynthesizer,
};

/// A micro-step draft with the given name and raw instruction.
pub fn draft(name: &str, instruction: &str) -> MicroStepDraft {
    MicroStepDraft {
        level_name: format!("LEVEL: {}", name.to_uppercase()),
        name: name.to_owned(),
        raw_instruction: instruction.to_owned(),
        mini_game_type: MiniGameType::Prep,
        reference_visual: None,
        reference_image_prompt: None,
    }
}

/// A quest with one outline step per entry of `outlines`.
pub fn quest(outlines: &[&str]) -> Quest {
    Quest {
        id: "quest-900".to_owned(),
        name: "The Test Kitchen".to_owned(),
        base_xp_reward: 100,
        gold_saved_label: "$7.25".to_owned(),
        steps: outlines
            .iter()
            .map(|instruction| QuestStepOutline {
                name: (*instruction).to_owned(),
                instruction: (*instruction).to_owned(),
            })
            .collect(),
        intro_narration: None,
    }
}

/// A decomposer that answers each outline instruction from a fixed table.
/// Unknown instructions fail.
#[derive(Debug, Default)]
pub struct TableDecomposer {
    answers: HashMap<String, Vec<MicroStepDraft>>,
}

impl TableDecomposer {
    pub fn with(mut self, instruction: &str, drafts: Vec<MicroStepDraft>) -> Self {
        self.answers.insert(instruction.to_owned(), drafts);
        self
    }
}

#[async_trait]
impl QuestDecomposer for TableDecomposer {
    async fn decompose(&self, instruction: &str) -> Result<Vec<MicroStepDraft>, CapabilityError> {
        self.answers
            .get(instruction)
            .cloned()
            .ok_or_else(|| CapabilityError::Failed(format!("no answer for {instruction}")))
    }
}

/// An evaluator that answers every photo with `result` after `delay`.
#[derive(Debug)]
pub struct FixedEvaluator {
    pub result: EvaluationResult,
    pub delay: Duration,
}

impl FixedEvaluator {
    pub fn new(result: EvaluationResult) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TechniqueEvaluator for FixedEvaluator {
    async fn evaluate(
        &self,
        _photo: &Photo,
        _step: &StepContext,
    ) -> Result<RawEvaluation, CapabilityError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone().into())
    }
}

/// An A-rank result worth `xp_bonus`.
pub fn graded(xp_bonus: u32) -> EvaluationResult {
    EvaluationResult {
        rank: Rank::A,
        feedback: "Clean cuts, Chef.".to_owned(),
        xp_bonus,
        safety_alert: None,
        cdm_speech: "Splendid work, Chef!".to_owned(),
    }
}

/// Fakes behind one session, kept so tests can inspect them.
pub struct Harness {
    pub log: Arc<RecordingNarrationLog>,
    pub audio: FakeAudioOutput,
    pub synthesizer: Arc<ScriptedSynthesizer>,
    pub rewards: Arc<RecordingRewardSink>,
}

impl Harness {
    /// Fakes whose synthesizer produces no audio, so spoken lines resolve
    /// at once.
    pub fn new() -> Self {
        Self::with_synthesizer(ScriptedSynthesizer::silent())
    }

    pub fn with_synthesizer(synthesizer: ScriptedSynthesizer) -> Self {
        Self {
            log: Arc::new(RecordingNarrationLog::new()),
            audio: FakeAudioOutput::new(),
            synthesizer: Arc::new(synthesizer),
            rewards: Arc::new(RecordingRewardSink::new()),
        }
    }

    pub fn deps(
        &self,
        decomposer: impl QuestDecomposer + 'static,
        evaluator: impl TechniqueEvaluator + 'static,
    ) -> SessionDeps {
        SessionDeps {
            decomposer: Arc::new(decomposer),
            evaluator: Arc::new(evaluator),
            synthesizer: Arc::clone(&self.synthesizer) as _,
            audio: Arc::new(AudioResource::new(Arc::new(self.audio.clone()))),
            log: Arc::clone(&self.log) as _,
            rewards: Arc::clone(&self.rewards) as _,
            clock: Arc::new(FixedClock::pinned()),
        }
    }

    /// Logged narration texts in order.
    pub fn texts(&self) -> Vec<String> {
        self.log.texts()
    }

    /// Waits until `text` has been logged.
    pub async fn wait_for_text(&self, text: &str) {
        wait_until(|| self.log.texts().iter().any(|logged| logged == text)).await;
    }
}

/// Interactive configuration without retry delays.
pub fn interactive() -> SessionConfig {
    SessionConfig {
        retry: RetryPolicy::no_retry(),
        ..SessionConfig::default()
    }
}

/// Demo presentation configuration.
pub fn demo() -> SessionConfig {
    SessionConfig {
        mode: PresentationMode::Demo,
        ..interactive()
    }
}

/// Polls `condition` until it holds, yielding to the runtime between polls.
///
/// # Panics
///
/// Panics if the condition does not hold within a thousand polls.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition never held");
}
