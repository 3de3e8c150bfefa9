//! Reviewing a submitted photo.

use kitchenquest_core::error::CapabilityError;
use kitchenquest_core::retry::RetryPolicy;
use tracing::{error, info};

use crate::application::evaluators::TechniqueEvaluator;
use crate::domain::evaluation::{EvaluationResult, Photo, StepContext};

/// Grades `photo` for `step`. Never fails: a malformed answer becomes
/// [`EvaluationResult::malfunction`] and a failed call, after retries,
/// becomes [`EvaluationResult::failed`].
pub async fn review_photo(
    evaluator: &dyn TechniqueEvaluator,
    retry: &RetryPolicy,
    photo: &Photo,
    step: &StepContext,
) -> EvaluationResult {
    let result = match retry
        .run("evaluate technique", move || evaluator.evaluate(photo, step))
        .await
    {
        Ok(raw) => raw.validate(),
        Err(CapabilityError::Malformed(reason)) => {
            error!(step = %step.step_name, %reason, "malformed evaluation response");
            EvaluationResult::malfunction()
        }
        Err(e) => {
            error!(step = %step.step_name, error = %e, "technique evaluation failed");
            EvaluationResult::failed()
        }
    };

    info!(
        quest_id = %step.quest_id,
        step = %step.step_name,
        rank = %result.rank,
        xp_bonus = result.xp_bonus,
        "technique evaluated"
    );
    result
}
