//! Food-safety screening of instructions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::evaluation::{EvaluationResult, Rank};

/// Severity of the worst detected risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No risk.
    #[default]
    None,
    /// Minor risk.
    Low,
    /// Moderate risk.
    Medium,
    /// Serious risk.
    High,
}

/// One detected hazard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedRisk {
    /// Hazard category, e.g. `raw_meat` or `knife`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short explanation.
    pub description: String,
}

/// Validated outcome of a food-safety check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSafetyReport {
    /// False when the instruction carries a hazard.
    pub is_safe: bool,
    /// Worst risk level.
    pub risk_level: RiskLevel,
    /// Hazards found.
    pub detected_risks: Vec<DetectedRisk>,
    /// Safer alternative or precaution.
    pub safety_advice: String,
    /// Whether the player should confirm before continuing.
    pub requires_confirmation: bool,
    /// Line to speak when confirmation is needed.
    pub confirmation_message: String,
}

impl FoodSafetyReport {
    /// Report used when the check itself could not run.
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            is_safe: true,
            risk_level: RiskLevel::None,
            detected_risks: Vec::new(),
            safety_advice: "Could not perform safety check. Proceed with caution.".to_owned(),
            requires_confirmation: false,
            confirmation_message: String::new(),
        }
    }

    /// Parses a JSON report, defaulting every missing field. A missing
    /// `is_safe` counts as unsafe; an unreadable body as unchecked.
    #[must_use]
    pub fn from_json(body: &str) -> Self {
        #[derive(Deserialize)]
        struct Raw {
            is_safe: Option<bool>,
            risk_level: Option<RiskLevel>,
            detected_risks: Option<Vec<DetectedRisk>>,
            safety_advice: Option<String>,
            requires_confirmation: Option<bool>,
            confirmation_message: Option<String>,
        }

        match serde_json::from_str::<Raw>(body) {
            Ok(raw) => Self {
                is_safe: raw.is_safe.unwrap_or(false),
                risk_level: raw.risk_level.unwrap_or_default(),
                detected_risks: raw.detected_risks.unwrap_or_default(),
                safety_advice: raw.safety_advice.unwrap_or_default(),
                requires_confirmation: raw.requires_confirmation.unwrap_or(false),
                confirmation_message: raw.confirmation_message.unwrap_or_default(),
            },
            Err(e) => {
                warn!(error = %e, "unreadable food safety report");
                Self::unchecked()
            }
        }
    }

    /// The evaluation that replaces photo grading for an unsafe
    /// instruction; `None` when the instruction is safe.
    #[must_use]
    pub fn hazard_evaluation(&self) -> Option<EvaluationResult> {
        if self.is_safe {
            return None;
        }

        let descriptions = self
            .detected_risks
            .iter()
            .map(|risk| risk.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let cdm_speech = if self.confirmation_message.trim().is_empty() {
            format!("WARNING, CHEF! {descriptions} Please review the safety advice!")
        } else {
            self.confirmation_message.clone()
        };

        Some(EvaluationResult {
            rank: if self.risk_level == RiskLevel::High {
                Rank::F
            } else {
                Rank::D
            },
            feedback: self.safety_advice.clone(),
            xp_bonus: 0,
            safety_alert: Some(format!("Safety Hazard: {descriptions}")),
            cdm_speech,
        })
    }
}
