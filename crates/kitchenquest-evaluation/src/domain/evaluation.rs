//! Technique evaluation results.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Letter grade for a technique photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Flawless.
    S,
    /// Excellent.
    A,
    /// Good.
    B,
    /// Fair.
    C,
    /// Poor, or a safety concern.
    D,
    /// Failed.
    F,
}

impl Rank {
    /// Parses the leading letter of a grade such as `s`, `A+`, or `B-rank`.
    #[must_use]
    pub fn from_grade(grade: &str) -> Option<Self> {
        match grade.trim().chars().next()?.to_ascii_uppercase() {
            'S' => Some(Self::S),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'F' => Some(Self::F),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// A photo of the player's work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// MIME type of `data`.
    pub mime_type: String,
}

impl Photo {
    /// A JPEG photo.
    #[must_use]
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: "image/jpeg".to_owned(),
        }
    }
}

/// The step a photo is graded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepContext {
    /// Quest identifier.
    pub quest_id: String,
    /// Micro-step name.
    pub step_name: String,
    /// Raw micro-step instruction, screened for food safety.
    pub instruction: String,
}

/// A validated evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    /// Grade.
    pub rank: Rank,
    /// Feedback shown to the player.
    pub feedback: String,
    /// Bonus XP added to the run.
    pub xp_bonus: u32,
    /// Hazard spotted, if any. Spoken after the CDM line.
    pub safety_alert: Option<String>,
    /// CDM line spoken for this result.
    pub cdm_speech: String,
}

impl EvaluationResult {
    /// Stand-in for a response that failed validation.
    #[must_use]
    pub fn malfunction() -> Self {
        Self {
            rank: Rank::F,
            feedback: "Evaluation system malfunction, Chef! Try again!".to_owned(),
            xp_bonus: 0,
            safety_alert: None,
            cdm_speech: "Error in evaluation, Chef! Try again!".to_owned(),
        }
    }

    /// Stand-in for an evaluation call that failed outright.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            rank: Rank::F,
            feedback: "Evaluation failed due to an error, Chef! Try again!".to_owned(),
            xp_bonus: 0,
            safety_alert: None,
            cdm_speech: "Evaluation failed, Chef. Try again!".to_owned(),
        }
    }
}

/// An evaluation as received from the grading capability. Nothing in it
/// is trusted until [`RawEvaluation::validate`] has run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawEvaluation {
    /// Grade text.
    #[serde(default)]
    pub rank: Option<String>,
    /// Feedback text.
    #[serde(default)]
    pub feedback: Option<String>,
    /// Bonus XP.
    #[serde(default, rename = "xpBonus", alias = "xp_bonus")]
    pub xp_bonus: Option<f64>,
    /// Hazard spotted, if any.
    #[serde(default)]
    pub safety_alert: Option<String>,
    /// CDM line.
    #[serde(default, rename = "cdmSpeech", alias = "cdm_speech")]
    pub cdm_speech: Option<String>,
}

impl RawEvaluation {
    /// Parses a JSON response body. A body that does not parse yields an
    /// empty evaluation, which validates to a malfunction.
    #[must_use]
    pub fn from_json(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable evaluation response");
            Self::default()
        })
    }

    /// Checks every required field; any gap yields
    /// [`EvaluationResult::malfunction`].
    #[must_use]
    pub fn validate(self) -> EvaluationResult {
        let rank = self.rank.as_deref().and_then(Rank::from_grade);
        let feedback = non_blank(self.feedback);
        let xp_bonus = self.xp_bonus.and_then(whole_xp);
        let cdm_speech = non_blank(self.cdm_speech);

        let (Some(rank), Some(feedback), Some(xp_bonus), Some(cdm_speech)) =
            (rank, feedback, xp_bonus, cdm_speech)
        else {
            warn!("evaluation response missing required fields");
            return EvaluationResult::malfunction();
        };

        EvaluationResult {
            rank,
            feedback,
            xp_bonus,
            safety_alert: non_blank(self.safety_alert),
            cdm_speech,
        }
    }
}

impl From<EvaluationResult> for RawEvaluation {
    fn from(result: EvaluationResult) -> Self {
        Self {
            rank: Some(result.rank.to_string()),
            feedback: Some(result.feedback),
            xp_bonus: Some(f64::from(result.xp_bonus)),
            safety_alert: result.safety_alert,
            cdm_speech: Some(result.cdm_speech),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_xp(xp: f64) -> Option<u32> {
    if !xp.is_finite() || xp < 0.0 {
        return None;
    }
    Some(xp.round().min(f64::from(u32::MAX)) as u32)
}
