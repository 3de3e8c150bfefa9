//! Decomposition of high-level recipe steps into micro-steps.

use async_trait::async_trait;
use kitchenquest_core::error::CapabilityError;
use serde::Deserialize;
use tracing::warn;

use crate::domain::fallback::fallback_drafts;
use crate::domain::micro_step::{MicroStepDraft, MiniGameType};

/// External capability that splits one instruction into micro-steps.
#[async_trait]
pub trait QuestDecomposer: Send + Sync {
    /// Splits `instruction` into ordered micro-step drafts.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError` when the service fails or answers with
    /// something unusable.
    async fn decompose(&self, instruction: &str) -> Result<Vec<MicroStepDraft>, CapabilityError>;
}

/// Decomposer for presentation mode: always the fixed fallback sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoDecomposer;

#[async_trait]
impl QuestDecomposer for DemoDecomposer {
    async fn decompose(&self, _instruction: &str) -> Result<Vec<MicroStepDraft>, CapabilityError> {
        Ok(fallback_drafts())
    }
}

/// One element of a decomposition service response, as received.
#[derive(Debug, Default, Deserialize)]
struct RawMicroStep {
    #[serde(default)]
    level_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default, rename = "miniGameType", alias = "mini_game_type")]
    mini_game_type: Option<String>,
    #[serde(default)]
    reference_visual: Option<String>,
    #[serde(default)]
    reference_image_prompt: Option<String>,
}

/// Validated decomposition service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionResponse {
    /// Drafts that passed validation, in response order.
    pub drafts: Vec<MicroStepDraft>,
}

impl DecompositionResponse {
    /// Parses and validates a JSON array of micro-steps.
    ///
    /// Elements without a name or instruction are dropped. A missing level
    /// name becomes empty and an unknown mini-game type becomes `PREP`.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError::Malformed` when the body is not a JSON
    /// array or no element survives validation.
    pub fn from_json(body: &str) -> Result<Self, CapabilityError> {
        let elements: Vec<serde_json::Value> = serde_json::from_str(body).map_err(|e| {
            CapabilityError::Malformed(format!("decomposition is not a JSON array: {e}"))
        })?;

        let drafts: Vec<MicroStepDraft> = elements
            .into_iter()
            .enumerate()
            .filter_map(|(position, element)| {
                let raw: RawMicroStep = match serde_json::from_value(element) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(position, error = %e, "dropping unreadable micro-step");
                        return None;
                    }
                };
                validate(position, raw)
            })
            .collect();

        if drafts.is_empty() {
            return Err(CapabilityError::Malformed(
                "decomposition yielded no usable micro-steps".to_owned(),
            ));
        }
        Ok(Self { drafts })
    }
}

fn validate(position: usize, raw: RawMicroStep) -> Option<MicroStepDraft> {
    let name = non_blank(raw.name);
    let instruction = non_blank(raw.instruction);
    let (Some(name), Some(raw_instruction)) = (name, instruction) else {
        warn!(position, "dropping micro-step without name or instruction");
        return None;
    };

    let mini_game_type = raw
        .mini_game_type
        .as_deref()
        .and_then(MiniGameType::from_label)
        .unwrap_or(MiniGameType::Prep);

    Some(MicroStepDraft {
        level_name: raw.level_name.unwrap_or_default(),
        name,
        raw_instruction,
        mini_game_type,
        reference_visual: non_blank(raw.reference_visual),
        reference_image_prompt: non_blank(raw.reference_image_prompt),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
