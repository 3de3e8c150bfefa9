//! Domain events for quest runs.

use kitchenquest_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Event type for [`QuestStarted`].
pub const QUEST_STARTED_EVENT_TYPE: &str = "quest.started";
/// Event type for [`EvaluationRecorded`].
pub const EVALUATION_RECORDED_EVENT_TYPE: &str = "quest.evaluation_recorded";
/// Event type for [`StepAdvanced`].
pub const STEP_ADVANCED_EVENT_TYPE: &str = "quest.step_advanced";
/// Event type for [`QuestCompleted`].
pub const QUEST_COMPLETED_EVENT_TYPE: &str = "quest.completed";
/// Event type for [`QuestAbandoned`].
pub const QUEST_ABANDONED_EVENT_TYPE: &str = "quest.abandoned";

/// Emitted when a run is initialised with its micro-steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStarted {
    /// The quest being attempted.
    pub quest_id: String,
    /// Number of micro-steps in the run.
    pub step_count: usize,
}

/// Emitted when an evaluation bonus is accepted for the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecorded {
    /// Index of the evaluated step.
    pub step_index: usize,
    /// Bonus granted for this evaluation.
    pub xp_bonus: u32,
    /// Accumulated bonus after this evaluation.
    pub total_bonus: u32,
}

/// Emitted when the run moves from one step to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepAdvanced {
    /// Step that was just completed.
    pub from_index: usize,
    /// Step that is now current.
    pub to_index: usize,
    /// True when the player skipped rather than finished the step.
    pub skipped: bool,
}

/// Emitted when the final step is advanced past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCompleted {
    /// Index of the final step.
    pub final_index: usize,
    /// True when the final step was skipped.
    pub skipped: bool,
    /// Base reward plus accumulated bonus.
    pub final_xp: u32,
    /// Gold saved label from the quest.
    pub gold_saved_label: String,
}

/// Emitted when the player leaves the run early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestAbandoned {
    /// Step that was current, if any.
    pub at_index: Option<usize>,
    /// Bonus discarded by abandoning.
    pub forfeited_bonus: u32,
}

/// Event payload variants for quest runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestEventKind {
    /// The run was initialised.
    QuestStarted(QuestStarted),
    /// An evaluation bonus was recorded.
    EvaluationRecorded(EvaluationRecorded),
    /// The run moved to the next step.
    StepAdvanced(StepAdvanced),
    /// The run reached its end.
    QuestCompleted(QuestCompleted),
    /// The run was abandoned.
    QuestAbandoned(QuestAbandoned),
}

impl QuestEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::QuestStarted(_) => QUEST_STARTED_EVENT_TYPE,
            Self::EvaluationRecorded(_) => EVALUATION_RECORDED_EVENT_TYPE,
            Self::StepAdvanced(_) => STEP_ADVANCED_EVENT_TYPE,
            Self::QuestCompleted(_) => QUEST_COMPLETED_EVENT_TYPE,
            Self::QuestAbandoned(_) => QUEST_ABANDONED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for quest runs.
#[derive(Debug, Clone)]
pub struct QuestEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: QuestEventKind,
}

impl DomainEvent for QuestEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("QuestEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
