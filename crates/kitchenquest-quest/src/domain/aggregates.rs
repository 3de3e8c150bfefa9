//! The quest run aggregate: one attempt at a quest, step by step.

use std::fmt;

use kitchenquest_core::aggregate::AggregateRoot;
use kitchenquest_core::clock::Clock;
use kitchenquest_core::error::DomainError;
use kitchenquest_core::event::EventMetadata;
use kitchenquest_core::reward::QuestReward;
use uuid::Uuid;

use super::events::{
    EvaluationRecorded, QuestAbandoned, QuestCompleted, QuestEvent, QuestEventKind, QuestStarted,
    StepAdvanced,
};
use super::micro_step::MicroStep;
use super::quest::Quest;

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestPhase {
    /// Created, steps not yet loaded.
    AwaitingFirstStep,
    /// Playing the step at this index.
    OnStep(usize),
    /// Every step was advanced past. Terminal.
    Complete,
    /// The player left early. Terminal.
    Abandoned,
}

impl QuestPhase {
    /// Returns true for `Complete` and `Abandoned`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Abandoned)
    }
}

impl fmt::Display for QuestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingFirstStep => f.write_str("awaiting first step"),
            Self::OnStep(index) => write!(f, "on step {}", index + 1),
            Self::Complete => f.write_str("complete"),
            Self::Abandoned => f.write_str("abandoned"),
        }
    }
}

/// Result of a successful advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The run moved to the step at this index.
    Moved {
        /// New current index.
        index: usize,
    },
    /// The final step was advanced past.
    Completed(QuestReward),
}

/// The aggregate root for a single quest attempt.
#[derive(Debug)]
pub struct QuestRun {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    quest_id: String,
    quest_name: String,
    base_xp_reward: u32,
    gold_saved_label: String,
    steps: Vec<MicroStep>,
    phase: QuestPhase,
    xp_bonus_accumulated: u32,
    pending_evaluation: Option<u32>,
    uncommitted_events: Vec<QuestEvent>,
}

impl QuestRun {
    /// Creates a run for `quest` with no steps loaded yet.
    #[must_use]
    pub fn new(id: Uuid, quest: &Quest) -> Self {
        Self {
            id,
            version: 0,
            quest_id: quest.id.clone(),
            quest_name: quest.name.clone(),
            base_xp_reward: quest.base_xp_reward,
            gold_saved_label: quest.gold_saved_label.clone(),
            steps: Vec::new(),
            phase: QuestPhase::AwaitingFirstStep,
            xp_bonus_accumulated: 0,
            pending_evaluation: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Identifier of the quest being attempted.
    #[must_use]
    pub fn quest_id(&self) -> &str {
        &self.quest_id
    }

    /// Display name of the quest being attempted.
    #[must_use]
    pub fn quest_name(&self) -> &str {
        &self.quest_name
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> QuestPhase {
        self.phase
    }

    /// All micro-steps in order.
    #[must_use]
    pub fn steps(&self) -> &[MicroStep] {
        &self.steps
    }

    /// Index of the current step while playing.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            QuestPhase::OnStep(index) => Some(index),
            _ => None,
        }
    }

    /// The current step while playing.
    #[must_use]
    pub fn current_step(&self) -> Option<&MicroStep> {
        self.current_index().and_then(|index| self.steps.get(index))
    }

    /// Bonus accumulated from evaluations so far.
    #[must_use]
    pub fn xp_bonus_accumulated(&self) -> u32 {
        self.xp_bonus_accumulated
    }

    /// Bonus recorded for the current step, if it has been evaluated.
    #[must_use]
    pub fn pending_evaluation(&self) -> Option<u32> {
        self.pending_evaluation
    }

    /// Loads the micro-steps and moves to the first one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the run is awaiting its
    /// first step, and `DomainError::EmptyQuest` when `steps` is empty.
    pub fn initialize(
        &mut self,
        steps: Vec<MicroStep>,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != QuestPhase::AwaitingFirstStep {
            return Err(DomainError::invalid_state("initialize", self.phase.to_string()));
        }
        if steps.is_empty() {
            return Err(DomainError::EmptyQuest);
        }

        let step_count = steps.len();
        self.steps = steps;
        self.record(
            QuestEventKind::QuestStarted(QuestStarted {
                quest_id: self.quest_id.clone(),
                step_count,
            }),
            clock,
        );
        Ok(())
    }

    /// Adds an evaluation bonus for the current step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless a step is current.
    pub fn record_evaluation(
        &mut self,
        xp_bonus: u32,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let QuestPhase::OnStep(step_index) = self.phase else {
            return Err(DomainError::invalid_state("record evaluation", self.phase.to_string()));
        };

        let total_bonus = self.xp_bonus_accumulated.saturating_add(xp_bonus);
        self.record(
            QuestEventKind::EvaluationRecorded(EvaluationRecorded {
                step_index,
                xp_bonus,
                total_bonus,
            }),
            clock,
        );
        Ok(())
    }

    /// Marks the current step completed and moves on. Skipping adds no
    /// bonus; past the last step the run completes and reports its reward.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless a step is current.
    pub fn advance(
        &mut self,
        skipped: bool,
        clock: &dyn Clock,
    ) -> Result<AdvanceOutcome, DomainError> {
        let QuestPhase::OnStep(from_index) = self.phase else {
            let operation = if skipped { "skip" } else { "advance" };
            return Err(DomainError::invalid_state(operation, self.phase.to_string()));
        };

        let to_index = from_index + 1;
        if to_index < self.steps.len() {
            self.record(
                QuestEventKind::StepAdvanced(StepAdvanced {
                    from_index,
                    to_index,
                    skipped,
                }),
                clock,
            );
            return Ok(AdvanceOutcome::Moved { index: to_index });
        }

        let reward = QuestReward {
            final_xp: self.base_xp_reward.saturating_add(self.xp_bonus_accumulated),
            gold_saved_label: self.gold_saved_label.clone(),
        };
        self.record(
            QuestEventKind::QuestCompleted(QuestCompleted {
                final_index: from_index,
                skipped,
                final_xp: reward.final_xp,
                gold_saved_label: reward.gold_saved_label.clone(),
            }),
            clock,
        );
        Ok(AdvanceOutcome::Completed(reward))
    }

    /// Leaves the run early, discarding accumulated bonus.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` once the run is terminal.
    pub fn abandon(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.phase.is_terminal() {
            return Err(DomainError::invalid_state("abandon", self.phase.to_string()));
        }

        self.record(
            QuestEventKind::QuestAbandoned(QuestAbandoned {
                at_index: self.current_index(),
                forfeited_bonus: self.xp_bonus_accumulated,
            }),
            clock,
        );
        Ok(())
    }

    fn record(&mut self, kind: QuestEventKind, clock: &dyn Clock) {
        let event = QuestEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.version + 1,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for QuestRun {
    type Event = QuestEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            QuestEventKind::QuestStarted(_) => {
                self.phase = QuestPhase::OnStep(0);
                self.xp_bonus_accumulated = 0;
                self.pending_evaluation = None;
            }
            QuestEventKind::EvaluationRecorded(payload) => {
                self.xp_bonus_accumulated = payload.total_bonus;
                self.pending_evaluation = Some(payload.xp_bonus);
            }
            QuestEventKind::StepAdvanced(payload) => {
                if let Some(step) = self.steps.get_mut(payload.from_index) {
                    step.completed = true;
                }
                self.phase = QuestPhase::OnStep(payload.to_index);
                self.pending_evaluation = None;
            }
            QuestEventKind::QuestCompleted(payload) => {
                if let Some(step) = self.steps.get_mut(payload.final_index) {
                    step.completed = true;
                }
                self.phase = QuestPhase::Complete;
                self.pending_evaluation = None;
            }
            QuestEventKind::QuestAbandoned(_) => {
                self.phase = QuestPhase::Abandoned;
                self.xp_bonus_accumulated = 0;
                self.pending_evaluation = None;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
