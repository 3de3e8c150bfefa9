//! The quest session actor.
//!
//! A session owns one quest run and the countdown for its current step.
//! Every command goes through a single task, so transitions, timer
//! re-arming, and the narration each transition triggers never interleave.
//! Photo grading runs outside that task and reports back; its result only
//! counts if the run is still on the step the photo was taken for.

use std::sync::Arc;

use kitchenquest_core::clock::Clock;
use kitchenquest_core::error::DomainError;
use kitchenquest_core::journal::NarrationLog;
use kitchenquest_core::retry::RetryPolicy;
use kitchenquest_core::reward::RewardSink;
use kitchenquest_core::speech::SpeechSynthesizer;
use kitchenquest_directives::parse;
use kitchenquest_evaluation::application::evaluators::{DemoEvaluator, TechniqueEvaluator};
use kitchenquest_evaluation::application::review::review_photo;
use kitchenquest_evaluation::domain::evaluation::{EvaluationResult, Photo, StepContext};
use kitchenquest_narration::{
    AudioResource, NarrationCoordinator, NarrationOutcome, NarrationRequest,
};
use kitchenquest_quest::application::assembly::assemble_micro_steps;
use kitchenquest_quest::application::command_handlers::{
    handle_abandon_quest, handle_advance_step, handle_record_evaluation, handle_start_quest,
};
use kitchenquest_quest::application::decomposition::{DemoDecomposer, QuestDecomposer};
use kitchenquest_quest::application::query_handlers::{StepView, format_countdown};
use kitchenquest_quest::domain::aggregates::{AdvanceOutcome, QuestPhase, QuestRun};
use kitchenquest_quest::domain::events::{QuestCompleted, QuestEvent, QuestEventKind};
use kitchenquest_quest::domain::micro_step::MicroStep;
use kitchenquest_quest::domain::quest::Quest;
use kitchenquest_timer::application::driver::TimerDriver;
use kitchenquest_timer::application::tick_source::TimerTick;
use kitchenquest_timer::domain::countdown::{StartOutcome, TickOutcome, TimerState};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;

const PROCESSING: &str = "Processing quest details, Chef! Preparing your micro-steps!";
const PROCESSING_FAILED: &str = "Quest processing failed, Chef! Try another quest!";
const TIMER_STARTED: &str = "Timer started, Chef!";
const TIMER_PAUSED: &str = "Timer paused, Chef.";
const TIMER_RESTARTED: &str = "Timer restarted, Chef!";
const TIME_UP: &str = "Time's up, Chef! What's next?";
const ANALYZING: &str = "Analyzing your technique, Chef! The CDM is watching!";
const SKIPPING: &str = "Skipping this trial, Chef. Onward to the next challenge!";
const ABANDONING: &str = "Abandoning the quest, Chef. Perhaps another time!";

const COMMAND_BUFFER: usize = 32;
const TICK_BUFFER: usize = 8;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

enum SessionCommand {
    Snapshot(Reply<SessionSnapshot>),
    StartTimer(Reply<StartOutcome>),
    PauseTimer(Reply<()>),
    RestartTimer(Reply<()>),
    SubmitPhoto {
        photo: Photo,
        reply: Reply<EvaluationResult>,
    },
    Evaluated {
        step_index: usize,
        result: EvaluationResult,
        reply: Reply<EvaluationResult>,
    },
    Advance {
        skipped: bool,
        reply: Reply<AdvanceOutcome>,
    },
    Abandon(Reply<()>),
}

/// External capabilities a session is built from.
///
/// In demo presentation mode `decomposer` and `evaluator` are replaced by
/// the canned demo implementations.
pub struct SessionDeps {
    /// Splits outline steps into micro-steps.
    pub decomposer: Arc<dyn QuestDecomposer>,
    /// Grades technique photos.
    pub evaluator: Arc<dyn TechniqueEvaluator>,
    /// Turns narration text into speech.
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    /// The shared speaker.
    pub audio: Arc<AudioResource>,
    /// Receives every narration line.
    pub log: Arc<dyn NarrationLog>,
    /// Receives the reward when the quest completes.
    pub rewards: Arc<dyn RewardSink>,
    /// Time source for events and log entries.
    pub clock: Arc<dyn Clock>,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Run identifier.
    pub run_id: Uuid,
    /// Quest identifier.
    pub quest_id: String,
    /// Quest display name.
    pub quest_name: String,
    /// Where the run stands.
    pub phase: QuestPhase,
    /// Every micro-step in order.
    pub steps: Vec<MicroStep>,
    /// The current step, rendered; `None` once the run has ended.
    pub current: Option<StepView>,
    /// Countdown state for the current step.
    pub timer: TimerState,
    /// Remaining countdown as `MM:SS`.
    pub countdown: String,
    /// Evaluation bonus accumulated so far.
    pub xp_bonus_accumulated: u32,
    /// Bonus recorded for the current step, if evaluated.
    pub pending_evaluation: Option<u32>,
}

/// Cloneable handle to a running quest session. The session stops once
/// every handle is dropped.
#[derive(Debug, Clone)]
pub struct QuestSessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    narration: Arc<NarrationCoordinator>,
}

impl QuestSessionHandle {
    /// Current state of the run and its countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` when the session has stopped.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(SessionCommand::Snapshot).await
    }

    /// Starts the countdown for the current step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain` when no step is current or the
    /// countdown cannot start.
    pub async fn start_timer(&self) -> Result<StartOutcome, SessionError> {
        self.request(SessionCommand::StartTimer).await
    }

    /// Pauses a running countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain` unless the countdown is running.
    pub async fn pause_timer(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::PauseTimer).await
    }

    /// Restarts an expired countdown at its full duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain` unless the countdown has expired.
    pub async fn restart_timer(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::RestartTimer).await
    }

    /// Grades `photo` against the current step and records its bonus.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain` when no step is current, or when the
    /// run moved to another step while the photo was being graded.
    pub async fn submit_photo(&self, photo: Photo) -> Result<EvaluationResult, SessionError> {
        self.request(|reply| SessionCommand::SubmitPhoto { photo, reply })
            .await
    }

    /// Completes the current step, or skips it when `skipped` is set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain` unless a step is current.
    pub async fn advance(&self, skipped: bool) -> Result<AdvanceOutcome, SessionError> {
        self.request(|reply| SessionCommand::Advance { skipped, reply })
            .await
    }

    /// Leaves the quest early.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain` once the run has ended.
    pub async fn abandon(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Abandon).await
    }

    /// Narrates an arbitrary line through the session's speaker.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Narration` when the line could not be played.
    pub async fn narrate(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationOutcome, SessionError> {
        Ok(self.narration.narrate(request).await?)
    }

    /// Returns true once the session has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }
}

/// The actor behind a [`QuestSessionHandle`].
pub struct QuestSession {
    run: QuestRun,
    timer: TimerDriver,
    ticks: mpsc::Receiver<TimerTick>,
    commands: mpsc::Receiver<SessionCommand>,
    loopback: mpsc::WeakSender<SessionCommand>,
    narration: Arc<NarrationCoordinator>,
    evaluator: Arc<dyn TechniqueEvaluator>,
    rewards: Arc<dyn RewardSink>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl QuestSession {
    /// Prepares `quest` and starts a session on its first micro-step.
    ///
    /// The preparation lines are spoken and awaited before this returns;
    /// the first step's instruction is narrated by the session afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Domain(DomainError::EmptyQuest)` when the
    /// quest yields no micro-steps.
    pub async fn start(
        quest: Quest,
        deps: SessionDeps,
        config: &SessionConfig,
    ) -> Result<QuestSessionHandle, SessionError> {
        let coordinator = NarrationCoordinator::new(
            deps.synthesizer,
            deps.audio,
            deps.log,
            Arc::clone(&deps.clock),
        )
        .with_mode(config.mode)
        .with_retry(config.retry)
        .with_format(config.pcm);
        let narration = Arc::new(coordinator);
        let (decomposer, evaluator): (Arc<dyn QuestDecomposer>, Arc<dyn TechniqueEvaluator>) =
            if config.mode.is_demo() {
                (Arc::new(DemoDecomposer), Arc::new(DemoEvaluator))
            } else {
                (deps.decomposer, deps.evaluator)
            };

        say(&narration, NarrationRequest::spoken(PROCESSING)).await;
        let steps = assemble_micro_steps(decomposer.as_ref(), &config.retry, &quest).await;
        let run = match handle_start_quest(&quest, steps, deps.clock.as_ref()) {
            Ok(started) => started.outcome,
            Err(e) => {
                warn!(quest_id = %quest.id, error = %e, "quest could not be prepared");
                say(&narration, NarrationRequest::spoken(PROCESSING_FAILED)).await;
                return Err(e.into());
            }
        };

        let intro = quest
            .intro_narration
            .filter(|intro| !intro.trim().is_empty())
            .unwrap_or_else(|| format!("Commencing Quest: {}!", quest.name));
        say(&narration, NarrationRequest::spoken(intro)).await;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (tick_tx, tick_rx) = mpsc::channel(TICK_BUFFER);
        let session = Self {
            run,
            timer: TimerDriver::new(tick_tx),
            ticks: tick_rx,
            commands: command_rx,
            loopback: command_tx.downgrade(),
            narration: Arc::clone(&narration),
            evaluator,
            rewards: deps.rewards,
            clock: deps.clock,
            retry: config.retry,
        };
        tokio::spawn(session.run());

        Ok(QuestSessionHandle {
            commands: command_tx,
            narration,
        })
    }

    async fn run(mut self) {
        info!(run_id = %self.run.id, quest_id = self.run.quest_id(), "quest session started");
        self.enter_step(0);

        loop {
            tokio::select! {
                biased;
                maybe_command = self.commands.recv() => match maybe_command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(tick) = self.ticks.recv() => self.on_tick(tick),
            }
        }

        self.timer.cancel();
        self.narration.silence().await;
        info!(run_id = %self.run.id, phase = %self.run.phase(), "quest session closed");
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(Ok(self.snapshot()));
            }
            SessionCommand::StartTimer(reply) => {
                let _ = reply.send(self.start_timer());
            }
            SessionCommand::PauseTimer(reply) => {
                let _ = reply.send(self.pause_timer());
            }
            SessionCommand::RestartTimer(reply) => {
                let _ = reply.send(self.restart_timer());
            }
            SessionCommand::SubmitPhoto { photo, reply } => self.submit_photo(photo, reply),
            SessionCommand::Evaluated {
                step_index,
                result,
                reply,
            } => {
                let _ = reply.send(self.record_evaluation(step_index, result));
            }
            SessionCommand::Advance { skipped, reply } => {
                let outcome = self.advance(skipped).await;
                let _ = reply.send(outcome);
            }
            SessionCommand::Abandon(reply) => {
                let _ = reply.send(self.abandon());
            }
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let timer = self.timer.state();
        SessionSnapshot {
            run_id: self.run.id,
            quest_id: self.run.quest_id().to_owned(),
            quest_name: self.run.quest_name().to_owned(),
            phase: self.run.phase(),
            steps: self.run.steps().to_vec(),
            current: StepView::from_run(&self.run),
            timer,
            countdown: format_countdown(timer.remaining_seconds),
            xp_bonus_accumulated: self.run.xp_bonus_accumulated(),
            pending_evaluation: self.run.pending_evaluation(),
        }
    }

    fn start_timer(&mut self) -> Result<StartOutcome, SessionError> {
        self.require_step("start timer")?;
        let outcome = self.timer.start()?;
        if outcome == StartOutcome::Started {
            self.announce(NarrationRequest::logged(TIMER_STARTED));
        }
        Ok(outcome)
    }

    fn pause_timer(&mut self) -> Result<(), SessionError> {
        self.require_step("pause timer")?;
        self.timer.pause()?;
        self.announce(NarrationRequest::logged(TIMER_PAUSED));
        Ok(())
    }

    fn restart_timer(&mut self) -> Result<(), SessionError> {
        self.require_step("restart timer")?;
        self.timer.restart()?;
        self.announce(NarrationRequest::logged(TIMER_RESTARTED));
        Ok(())
    }

    fn on_tick(&mut self, tick: TimerTick) {
        if self.timer.on_tick(tick) == TickOutcome::Expired {
            info!(run_id = %self.run.id, "step timer expired");
            self.announce(NarrationRequest::logged(TIME_UP));
        }
    }

    fn submit_photo(&self, photo: Photo, reply: Reply<EvaluationResult>) {
        let current = (self.run.current_index(), self.run.current_step());
        let (Some(step_index), Some(step)) = current else {
            let _ = reply.send(Err(self.not_on_step("submit photo").into()));
            return;
        };

        let context = StepContext {
            quest_id: self.run.quest_id().to_owned(),
            step_name: step.name.clone(),
            instruction: step.raw_instruction.clone(),
        };
        let narration = Arc::clone(&self.narration);
        let evaluator = Arc::clone(&self.evaluator);
        let retry = self.retry;
        let loopback = self.loopback.clone();

        tokio::spawn(async move {
            say(&narration, NarrationRequest::spoken(ANALYZING)).await;
            let result = review_photo(evaluator.as_ref(), &retry, &photo, &context).await;

            let Some(commands) = loopback.upgrade() else {
                debug!(step = %context.step_name, "session closed before the evaluation finished");
                return;
            };
            let evaluated = SessionCommand::Evaluated {
                step_index,
                result,
                reply,
            };
            if commands.send(evaluated).await.is_err() {
                debug!(step = %context.step_name, "session closed before the evaluation was recorded");
            }
        });
    }

    fn record_evaluation(
        &mut self,
        step_index: usize,
        result: EvaluationResult,
    ) -> Result<EvaluationResult, SessionError> {
        if self.run.current_index() != Some(step_index) {
            warn!(run_id = %self.run.id, step_index, phase = %self.run.phase(), "discarding stale evaluation");
            return Err(self.not_on_step("record evaluation").into());
        }
        handle_record_evaluation(&mut self.run, result.xp_bonus, self.clock.as_ref())?;

        let narration = Arc::clone(&self.narration);
        let speech = result.cdm_speech.clone();
        let alert = result.safety_alert.clone();
        tokio::spawn(async move {
            say(&narration, NarrationRequest::spoken(speech)).await;
            if let Some(alert) = alert {
                say(&narration, NarrationRequest::spoken(alert)).await;
            }
        });
        Ok(result)
    }

    async fn advance(&mut self, skipped: bool) -> Result<AdvanceOutcome, SessionError> {
        if skipped && self.run.current_index().is_some() {
            say(&self.narration, NarrationRequest::logged(SKIPPING)).await;
        }
        let advanced = handle_advance_step(
            &mut self.run,
            skipped,
            self.clock.as_ref(),
            self.rewards.as_ref(),
        )
        .await?;
        self.react(&advanced.events);
        Ok(advanced.outcome)
    }

    fn abandon(&mut self) -> Result<(), SessionError> {
        let abandoned = handle_abandon_quest(&mut self.run, self.clock.as_ref())?;
        self.react(&abandoned.events);
        Ok(())
    }

    /// Drives the timer and narration from the events a command recorded.
    fn react(&mut self, events: &[QuestEvent]) {
        for event in events {
            match &event.kind {
                QuestEventKind::StepAdvanced(advanced) => self.enter_step(advanced.to_index),
                QuestEventKind::QuestCompleted(completed) => {
                    self.timer.arm(None);
                    self.announce(NarrationRequest::spoken(completion_line(completed)));
                }
                QuestEventKind::QuestAbandoned(_) => {
                    self.timer.arm(None);
                    self.announce(NarrationRequest::spoken(ABANDONING));
                }
                QuestEventKind::QuestStarted(_) | QuestEventKind::EvaluationRecorded(_) => {}
            }
        }
    }

    fn enter_step(&mut self, index: usize) {
        let Some(step) = self.run.steps().get(index) else {
            return;
        };
        let parsed = parse(&step.raw_instruction);
        self.timer.arm(parsed.timer);
        self.announce(NarrationRequest::spoken(format!(
            "Alright, Chef! {}",
            parsed.clean_instruction
        )));
    }

    fn require_step(&self, operation: &'static str) -> Result<usize, DomainError> {
        self.run
            .current_index()
            .ok_or_else(|| self.not_on_step(operation))
    }

    fn not_on_step(&self, operation: &'static str) -> DomainError {
        DomainError::invalid_state(operation, self.run.phase().to_string())
    }

    /// Narrates without waiting for the line to finish.
    fn announce(&self, request: NarrationRequest) {
        let narration = Arc::clone(&self.narration);
        tokio::spawn(async move {
            say(&narration, request).await;
        });
    }
}

async fn say(narration: &NarrationCoordinator, request: NarrationRequest) {
    if let Err(e) = narration.narrate(request).await {
        warn!(error = %e, "session narration failed");
    }
}

fn completion_line(completed: &QuestCompleted) -> String {
    format!(
        "Quest completed, Chef! You earned {} XP and {} gold! Consumed ingredients have been removed from your inventory!",
        completed.final_xp, completed.gold_saved_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_line_includes_xp_and_gold_label() {
        let completed = QuestCompleted {
            final_index: 4,
            skipped: false,
            final_xp: 170,
            gold_saved_label: "$13.00".to_owned(),
        };

        assert_eq!(
            completion_line(&completed),
            "Quest completed, Chef! You earned 170 XP and $13.00 gold! Consumed ingredients have been removed from your inventory!"
        );
    }
}
