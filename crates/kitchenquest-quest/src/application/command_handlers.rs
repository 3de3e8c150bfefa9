//! Command handlers for quest runs.
//!
//! Each handler executes one command against the run, drains the events it
//! produced, logs them, and hands them back so the caller can react.

use kitchenquest_core::aggregate::AggregateRoot;
use kitchenquest_core::clock::Clock;
use kitchenquest_core::error::DomainError;
use kitchenquest_core::event::DomainEvent;
use kitchenquest_core::reward::RewardSink;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::aggregates::{AdvanceOutcome, QuestRun};
use crate::domain::events::QuestEvent;
use crate::domain::micro_step::MicroStep;
use crate::domain::quest::Quest;

/// Outcome of a handled command together with the events it produced.
#[derive(Debug)]
pub struct QuestCommandResult<T> {
    /// Command-specific outcome.
    pub outcome: T,
    /// Events recorded by the command, in order.
    pub events: Vec<QuestEvent>,
}

fn drain(run: &mut QuestRun) -> Vec<QuestEvent> {
    let events = run.take_uncommitted_events();
    for event in &events {
        let meta = event.metadata();
        info!(
            run_id = %meta.aggregate_id,
            event_type = event.event_type(),
            sequence_number = meta.sequence_number,
            payload = %event.to_payload(),
            "quest event recorded"
        );
    }
    events
}

/// Creates a run for `quest` and loads its micro-steps.
///
/// # Errors
///
/// Returns `DomainError::EmptyQuest` when `steps` is empty.
pub fn handle_start_quest(
    quest: &Quest,
    steps: Vec<MicroStep>,
    clock: &dyn Clock,
) -> Result<QuestCommandResult<QuestRun>, DomainError> {
    let mut run = QuestRun::new(Uuid::now_v7(), quest);
    run.initialize(steps, clock)?;
    let events = drain(&mut run);
    Ok(QuestCommandResult {
        outcome: run,
        events,
    })
}

/// Records an evaluation bonus for the current step.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` unless a step is current.
pub fn handle_record_evaluation(
    run: &mut QuestRun,
    xp_bonus: u32,
    clock: &dyn Clock,
) -> Result<QuestCommandResult<()>, DomainError> {
    run.record_evaluation(xp_bonus, clock)?;
    Ok(QuestCommandResult {
        outcome: (),
        events: drain(run),
    })
}

/// Advances (or skips) the current step. On completion the reward is
/// reported to `rewards` exactly once.
///
/// A failing reward sink is logged; the run stays complete.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` unless a step is current.
pub async fn handle_advance_step(
    run: &mut QuestRun,
    skipped: bool,
    clock: &dyn Clock,
    rewards: &dyn RewardSink,
) -> Result<QuestCommandResult<AdvanceOutcome>, DomainError> {
    let outcome = run.advance(skipped, clock)?;
    let events = drain(run);

    if let AdvanceOutcome::Completed(reward) = &outcome
        && let Err(e) = rewards.quest_completed(reward).await
    {
        error!(run_id = %run.id, error = %e, "failed to report quest reward");
    }

    Ok(QuestCommandResult { outcome, events })
}

/// Abandons the run.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` once the run is terminal.
pub fn handle_abandon_quest(
    run: &mut QuestRun,
    clock: &dyn Clock,
) -> Result<QuestCommandResult<()>, DomainError> {
    run.abandon(clock)?;
    Ok(QuestCommandResult {
        outcome: (),
        events: drain(run),
    })
}
