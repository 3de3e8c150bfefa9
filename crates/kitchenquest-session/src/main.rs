//! Plays one quest end to end in demo presentation mode, logging each step.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use kitchenquest_core::clock::SystemClock;
use kitchenquest_core::error::{CapabilityError, DomainError};
use kitchenquest_core::reward::{QuestReward, RewardSink};
use kitchenquest_core::speech::SpeechSynthesizer;
use kitchenquest_evaluation::application::evaluators::DemoEvaluator;
use kitchenquest_evaluation::domain::evaluation::Photo;
use kitchenquest_narration::{AudioResource, PresentationMode, TracingNarrationLog};
use kitchenquest_quest::application::decomposition::DemoDecomposer;
use kitchenquest_quest::domain::aggregates::AdvanceOutcome;
use kitchenquest_quest::domain::quest::{Quest, QuestStepOutline};
use kitchenquest_session::{QuestSession, SessionConfig, SessionDeps, init_tracing};
use tracing::info;

struct MutedSynthesizer;

#[async_trait]
impl SpeechSynthesizer for MutedSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Option<Vec<u8>>, CapabilityError> {
        Ok(None)
    }
}

struct LoggedRewards;

#[async_trait]
impl RewardSink for LoggedRewards {
    async fn quest_completed(&self, reward: &QuestReward) -> Result<(), DomainError> {
        info!(
            final_xp = reward.final_xp,
            gold_saved = reward.gold_amount(),
            "reward granted"
        );
        Ok(())
    }
}

fn demo_quest() -> Quest {
    Quest {
        id: "quest-003".to_owned(),
        name: "The Sizzling Skillet Trial".to_owned(),
        base_xp_reward: 150,
        gold_saved_label: "$9.50".to_owned(),
        steps: vec![QuestStepOutline {
            name: "Brown the Meat".to_owned(),
            instruction: "Dice the peppers, heat the pan with oil, then brown the ground meat."
                .to_owned(),
        }],
        intro_narration: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    init_tracing()?;

    let mut config = SessionConfig::from_env()?;
    // No speaker is attached to this binary.
    config.mode = PresentationMode::Demo;

    let deps = SessionDeps {
        decomposer: Arc::new(DemoDecomposer),
        evaluator: Arc::new(DemoEvaluator),
        synthesizer: Arc::new(MutedSynthesizer),
        audio: Arc::new(AudioResource::uninitialized()),
        log: Arc::new(TracingNarrationLog),
        rewards: Arc::new(LoggedRewards),
        clock: Arc::new(SystemClock),
    };
    let session = QuestSession::start(demo_quest(), deps, &config).await?;

    loop {
        let snapshot = session.snapshot().await?;
        if let Some(step) = &snapshot.current {
            info!(
                stage = %step.stage_label,
                step = %step.name,
                instruction = %step.clean_instruction,
                heat = step.heat_display.as_deref().unwrap_or("-"),
                countdown = %snapshot.countdown,
                "current step"
            );
        }

        let evaluation = session.submit_photo(Photo::jpeg(Vec::new())).await?;
        info!(rank = %evaluation.rank, xp_bonus = evaluation.xp_bonus, "photo graded");

        if let AdvanceOutcome::Completed(reward) = session.advance(false).await? {
            info!(final_xp = reward.final_xp, gold = %reward.gold_saved_label, "quest complete");
            break;
        }
    }

    Ok(())
}
