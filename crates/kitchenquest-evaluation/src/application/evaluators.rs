//! Evaluator ports and the evaluators built on them.

use async_trait::async_trait;
use kitchenquest_core::error::CapabilityError;
use kitchenquest_core::retry::RetryPolicy;
use tracing::{info, warn};

use crate::domain::evaluation::{EvaluationResult, Photo, Rank, RawEvaluation, StepContext};
use crate::domain::safety::FoodSafetyReport;

/// External capability that grades a technique photo.
#[async_trait]
pub trait TechniqueEvaluator: Send + Sync {
    /// Grades `photo` against `step`.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError` when the capability cannot answer.
    async fn evaluate(
        &self,
        photo: &Photo,
        step: &StepContext,
    ) -> Result<RawEvaluation, CapabilityError>;
}

/// External capability that screens one instruction for food-safety risks.
#[async_trait]
pub trait FoodSafetyChecker: Send + Sync {
    /// Screens `instruction`.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError` when the capability cannot answer.
    async fn check(&self, instruction: &str) -> Result<FoodSafetyReport, CapabilityError>;
}

/// Screens the step instruction before grading the photo. An unsafe
/// instruction is answered with the hazard evaluation and the photo is
/// never graded. A check that cannot run counts as safe.
#[derive(Debug)]
pub struct SafetyGatedEvaluator<G, C> {
    grader: G,
    checker: C,
    retry: RetryPolicy,
}

impl<G, C> SafetyGatedEvaluator<G, C> {
    /// Wraps `grader` with `checker`, retrying the check per `retry`.
    #[must_use]
    pub fn new(grader: G, checker: C, retry: RetryPolicy) -> Self {
        Self {
            grader,
            checker,
            retry,
        }
    }
}

#[async_trait]
impl<G, C> TechniqueEvaluator for SafetyGatedEvaluator<G, C>
where
    G: TechniqueEvaluator,
    C: FoodSafetyChecker,
{
    async fn evaluate(
        &self,
        photo: &Photo,
        step: &StepContext,
    ) -> Result<RawEvaluation, CapabilityError> {
        let checker = &self.checker;
        let instruction = step.instruction.as_str();
        let report = match self
            .retry
            .run("food safety check", move || checker.check(instruction))
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(step = %step.step_name, error = %e, "food safety check unavailable, proceeding");
                FoodSafetyReport::unchecked()
            }
        };

        if let Some(hazard) = report.hazard_evaluation() {
            info!(
                step = %step.step_name,
                risk_level = ?report.risk_level,
                risks = report.detected_risks.len(),
                "instruction flagged unsafe"
            );
            return Ok(hazard.into());
        }

        self.grader.evaluate(photo, step).await
    }
}

/// Evaluator for presentation mode: canned results, no capability calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoEvaluator;

impl DemoEvaluator {
    fn success() -> EvaluationResult {
        EvaluationResult {
            rank: Rank::S,
            feedback: "Your technique is flawless, Chef! A true master of the culinary arts!"
                .to_owned(),
            xp_bonus: 50,
            safety_alert: None,
            cdm_speech: "Magnificent, Chef! An S-rank performance!".to_owned(),
        }
    }

    fn raw_chicken() -> EvaluationResult {
        EvaluationResult {
            rank: Rank::D,
            feedback: "DEMO SAFETY WARNING: Raw chicken must be cooked thoroughly to avoid food poisoning!"
                .to_owned(),
            xp_bonus: 0,
            safety_alert: Some("Raw Meat Handling".to_owned()),
            cdm_speech: "WHOA, CHEF! SAFETY FIRST! Raw chicken needs thorough cooking! Don't risk it!"
                .to_owned(),
        }
    }

    fn knife_on_edge() -> EvaluationResult {
        EvaluationResult {
            rank: Rank::D,
            feedback: "Careful, Chef! Safety first! Your knife is too close to the edge. Adjust your stance."
                .to_owned(),
            xp_bonus: 0,
            safety_alert: Some("Knife left on edge!".to_owned()),
            cdm_speech: "Whoa there, Chef! Safety first! Watch that blade!".to_owned(),
        }
    }

    fn bad_cooking() -> EvaluationResult {
        EvaluationResult {
            rank: Rank::C,
            feedback: "Mama isn't mad, Chef! But your cooking is a bit off. Perhaps too much heat, or not enough stirring! Review the reference image for optimal results."
                .to_owned(),
            xp_bonus: 10,
            safety_alert: None,
            cdm_speech: "A valiant effort, Chef! But your technique needs refining. The culinary gods demand perfection!"
                .to_owned(),
        }
    }

    /// The canned result for `step`.
    #[must_use]
    pub fn result_for(step: &StepContext) -> EvaluationResult {
        let instruction = step.instruction.to_lowercase();
        if instruction.contains("raw chicken") && !instruction.contains("cook thoroughly") {
            return Self::raw_chicken();
        }

        match (step.quest_id.as_str(), step.step_name.as_str()) {
            ("quest-001", "Prepare Vegetables") => Self::knife_on_edge(),
            ("quest-001", "Sauté Onions and Mushrooms") | ("quest-002", "Sear Chicken Cubes") => {
                Self::bad_cooking()
            }
            _ => Self::success(),
        }
    }
}

#[async_trait]
impl TechniqueEvaluator for DemoEvaluator {
    async fn evaluate(
        &self,
        _photo: &Photo,
        step: &StepContext,
    ) -> Result<RawEvaluation, CapabilityError> {
        Ok(Self::result_for(step).into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::domain::safety::{DetectedRisk, RiskLevel};

    struct CountingGrader {
        calls: AtomicU32,
    }

    #[async_trait]
    impl TechniqueEvaluator for CountingGrader {
        async fn evaluate(
            &self,
            _photo: &Photo,
            _step: &StepContext,
        ) -> Result<RawEvaluation, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DemoEvaluator::success().into())
        }
    }

    struct FixedChecker(Result<FoodSafetyReport, CapabilityError>);

    #[async_trait]
    impl FoodSafetyChecker for FixedChecker {
        async fn check(&self, _instruction: &str) -> Result<FoodSafetyReport, CapabilityError> {
            self.0.clone()
        }
    }

    fn step(quest_id: &str, step_name: &str, instruction: &str) -> StepContext {
        StepContext {
            quest_id: quest_id.to_owned(),
            step_name: step_name.to_owned(),
            instruction: instruction.to_owned(),
        }
    }

    fn gated(checker: FixedChecker) -> SafetyGatedEvaluator<CountingGrader, FixedChecker> {
        SafetyGatedEvaluator::new(
            CountingGrader {
                calls: AtomicU32::new(0),
            },
            checker,
            RetryPolicy::no_retry(),
        )
    }

    #[tokio::test]
    async fn test_unsafe_instruction_skips_grading() {
        // Arrange
        let report = FoodSafetyReport {
            is_safe: false,
            risk_level: RiskLevel::High,
            detected_risks: vec![DetectedRisk {
                kind: "oil_splatter".to_owned(),
                description: "Hot oil may splatter".to_owned(),
            }],
            safety_advice: "Lower the food in gently.".to_owned(),
            requires_confirmation: true,
            confirmation_message: String::new(),
        };
        let evaluator = gated(FixedChecker(Ok(report)));
        let photo = Photo::jpeg(vec![0xFF, 0xD8]);
        let context = step("q", "Fry", "Drop it in the oil.");

        // Act
        let result = evaluator
            .evaluate(&photo, &context)
            .await
            .unwrap()
            .validate();

        // Assert
        assert_eq!(result.rank, Rank::F);
        assert_eq!(
            result.safety_alert.as_deref(),
            Some("Safety Hazard: Hot oil may splatter")
        );
        assert_eq!(evaluator.grader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_safety_check_proceeds_to_grading() {
        let evaluator = gated(FixedChecker(Err(CapabilityError::Failed("down".to_owned()))));

        let result = evaluator
            .evaluate(&Photo::jpeg(Vec::new()), &step("q", "Stir", "Stir."))
            .await
            .unwrap()
            .validate();

        assert_eq!(result.rank, Rank::S);
        assert_eq!(evaluator.grader.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_demo_flags_raw_chicken_unless_cooked_thoroughly() {
        let raw = step("quest-002", "Dice Chicken", "Dice the RAW CHICKEN.");
        let cooked = step(
            "quest-002",
            "Dice Chicken",
            "Dice the raw chicken, then cook thoroughly.",
        );

        let flagged = DemoEvaluator::result_for(&raw);
        let cooked = DemoEvaluator::result_for(&cooked);

        assert_eq!(flagged.rank, Rank::D);
        assert_eq!(flagged.safety_alert.as_deref(), Some("Raw Meat Handling"));
        assert_eq!(cooked.rank, Rank::S);
        assert_eq!(cooked.xp_bonus, 50);
    }

    #[test]
    fn test_demo_canned_step_results() {
        let canned = |quest, name| DemoEvaluator::result_for(&step(quest, name, "Plate it."));

        assert_eq!(canned("quest-001", "Prepare Vegetables").rank, Rank::D);
        assert_eq!(canned("quest-002", "Sear Chicken Cubes").xp_bonus, 10);
        assert_eq!(canned("quest-009", "Anything").rank, Rank::S);
    }
}
