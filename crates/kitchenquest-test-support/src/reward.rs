//! Recording reward sink.

use std::sync::Mutex;

use async_trait::async_trait;
use kitchenquest_core::error::DomainError;
use kitchenquest_core::reward::{QuestReward, RewardSink};

/// A reward sink that records every reported reward, optionally failing.
#[derive(Debug, Default)]
pub struct RecordingRewardSink {
    rewards: Mutex<Vec<QuestReward>>,
    fail: bool,
}

impl RecordingRewardSink {
    /// Creates a sink that accepts every reward.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that records every reward and then reports failure.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            rewards: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Returns a snapshot of all reported rewards.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn rewards(&self) -> Vec<QuestReward> {
        self.rewards.lock().unwrap().clone()
    }
}

#[async_trait]
impl RewardSink for RecordingRewardSink {
    async fn quest_completed(&self, reward: &QuestReward) -> Result<(), DomainError> {
        self.rewards.lock().unwrap().push(reward.clone());
        if self.fail {
            return Err(DomainError::Validation("reward store offline".to_owned()));
        }
        Ok(())
    }
}
