//! Micro-steps: the beginner-sized units a quest is played through.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mini-game presented for a micro-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MiniGameType {
    /// Cutting, slicing, dicing.
    Chop,
    /// Adding oil, seasoning, arranging ingredients.
    Prep,
    /// Cooking with heat.
    Sizzle,
    /// Waiting for a colour change or doneness.
    Wait,
}

impl MiniGameType {
    /// Parses a label such as `chop` or ` SIZZLE `.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "CHOP" => Some(Self::Chop),
            "PREP" => Some(Self::Prep),
            "SIZZLE" => Some(Self::Sizzle),
            "WAIT" => Some(Self::Wait),
            _ => None,
        }
    }
}

impl fmt::Display for MiniGameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Chop => "CHOP",
            Self::Prep => "PREP",
            Self::Sizzle => "SIZZLE",
            Self::Wait => "WAIT",
        };
        f.write_str(label)
    }
}

/// One micro-step as returned by the decomposition service, before it is
/// numbered within a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroStepDraft {
    /// Level banner, e.g. `LEVEL 1: THE PEPPER CHOP`.
    pub level_name: String,
    /// Concise step name.
    pub name: String,
    /// Instruction text with embedded directive tokens.
    pub raw_instruction: String,
    /// Mini-game type.
    pub mini_game_type: MiniGameType,
    /// What the finished step should look like.
    pub reference_visual: Option<String>,
    /// Prompt for generating a reference image.
    pub reference_image_prompt: Option<String>,
}

impl MicroStepDraft {
    /// Numbers the draft within its quest.
    #[must_use]
    pub fn into_step(self, id: u32) -> MicroStep {
        MicroStep {
            id,
            level_name: self.level_name,
            name: self.name,
            raw_instruction: self.raw_instruction,
            mini_game_type: self.mini_game_type,
            completed: false,
            reference_visual: self.reference_visual,
            reference_image_prompt: self.reference_image_prompt,
        }
    }
}

/// A numbered micro-step owned by a quest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroStep {
    /// 1-based position in the flattened quest.
    pub id: u32,
    /// Level banner.
    pub level_name: String,
    /// Concise step name.
    pub name: String,
    /// Instruction text with embedded directive tokens.
    pub raw_instruction: String,
    /// Mini-game type.
    pub mini_game_type: MiniGameType,
    /// Set once the run advances past this step.
    pub completed: bool,
    /// What the finished step should look like.
    pub reference_visual: Option<String>,
    /// Prompt for generating a reference image.
    pub reference_image_prompt: Option<String>,
}
