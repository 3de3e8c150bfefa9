//! Flattening a quest into numbered micro-steps.

use kitchenquest_core::retry::RetryPolicy;
use tracing::{info, warn};

use crate::application::decomposition::QuestDecomposer;
use crate::domain::fallback::fallback_drafts;
use crate::domain::micro_step::MicroStep;
use crate::domain::quest::Quest;

/// Decomposes every outline step of `quest` in order and numbers the
/// resulting micro-steps from 1.
///
/// A decomposition call that fails after retries, or returns nothing, is
/// replaced by the fallback sequence for that outline step only.
pub async fn assemble_micro_steps(
    decomposer: &dyn QuestDecomposer,
    retry: &RetryPolicy,
    quest: &Quest,
) -> Vec<MicroStep> {
    let mut steps = Vec::new();

    for (position, outline) in quest.steps.iter().enumerate() {
        let instruction = outline.instruction.as_str();
        let drafts = match retry
            .run("decompose step", move || decomposer.decompose(instruction))
            .await
        {
            Ok(drafts) if !drafts.is_empty() => drafts,
            Ok(_) => {
                warn!(quest_id = %quest.id, position, "decomposition returned no micro-steps, using fallback");
                fallback_drafts()
            }
            Err(e) => {
                warn!(quest_id = %quest.id, position, error = %e, "decomposition failed, using fallback");
                fallback_drafts()
            }
        };

        for draft in drafts {
            let id = u32::try_from(steps.len() + 1).unwrap_or(u32::MAX);
            steps.push(draft.into_step(id));
        }
    }

    info!(quest_id = %quest.id, micro_steps = steps.len(), "assembled quest");
    steps
}
