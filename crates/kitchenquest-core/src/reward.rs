//! Quest reward port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Values reported when a quest run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    /// Base quest reward plus every accumulated evaluation bonus.
    pub final_xp: u32,
    /// Display label for money saved, e.g. `$13.00`.
    pub gold_saved_label: String,
}

impl QuestReward {
    /// Numeric value of the gold label; digits and dots only, 0.0 when
    /// nothing parses.
    #[must_use]
    pub fn gold_amount(&self) -> f64 {
        let numeric: String = self
            .gold_saved_label
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        numeric.parse().unwrap_or(0.0)
    }
}

/// Collaborator that persists progression and removes consumed
/// ingredients once a quest completes.
#[async_trait]
pub trait RewardSink: Send + Sync {
    /// Called exactly once per completed quest run.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] when the reward could not be persisted.
    async fn quest_completed(&self, reward: &QuestReward) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(label: &str) -> QuestReward {
        QuestReward {
            final_xp: 0,
            gold_saved_label: label.to_owned(),
        }
    }

    #[test]
    fn test_gold_amount_strips_currency_symbol() {
        assert!((reward("$13.00").gold_amount() - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gold_amount_defaults_to_zero_when_unparseable() {
        assert!(reward("a lot").gold_amount().abs() < f64::EPSILON);
        assert!(reward("1.2.3").gold_amount().abs() < f64::EPSILON);
    }
}
