//! Recipe quests as offered on the quest board.

use serde::{Deserialize, Serialize};

/// One high-level recipe step before decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStepOutline {
    /// Short step name.
    pub name: String,
    /// Possibly long, combined instruction.
    pub instruction: String,
}

/// A recipe quest selected by the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    /// Quest identifier, e.g. `quest-001`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// XP granted on completion before evaluation bonuses.
    pub base_xp_reward: u32,
    /// Display label for money saved, e.g. `$13.00`.
    pub gold_saved_label: String,
    /// High-level steps in recipe order.
    pub steps: Vec<QuestStepOutline>,
    /// Optional narrator line spoken when the quest begins.
    #[serde(default)]
    pub intro_narration: Option<String>,
}
