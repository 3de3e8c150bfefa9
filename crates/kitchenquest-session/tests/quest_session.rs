//! End-to-end quest session flows over test fakes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use kitchenquest_core::error::{AudioError, DomainError};
use kitchenquest_core::reward::QuestReward;
use kitchenquest_evaluation::domain::evaluation::{EvaluationResult, Photo, Rank};
use kitchenquest_narration::{AudioResource, NarrationError, NarrationOutcome, NarrationRequest};
use kitchenquest_quest::domain::aggregates::{AdvanceOutcome, QuestPhase};
use kitchenquest_session::{QuestSession, SessionError};
use kitchenquest_test_support::{AudioEvent, ScriptedSynthesizer};
use kitchenquest_timer::domain::countdown::{StartOutcome, TimerPhase};

use common::{
    FixedEvaluator, Harness, TableDecomposer, demo, draft, graded, interactive, quest, wait_until,
};

const PROCESSING: &str = "Processing quest details, Chef! Preparing your micro-steps!";
const SKIPPING: &str = "Skipping this trial, Chef. Onward to the next challenge!";
const ANALYZING: &str = "Analyzing your technique, Chef! The CDM is watching!";
const ABANDONING: &str = "Abandoning the quest, Chef. Perhaps another time!";
const TIME_UP: &str = "Time's up, Chef! What's next?";

const ONE_MINUTE: &str = r#"Simmer the sauce. [ACTION: SET_TIMER | TIME: 1m | LABEL: "SIMMER"]"#;
const TWO_MINUTES: &str = r#"Rest the meat. [ACTION: SET_TIMER | TIME: 2m | LABEL: "REST"]"#;

fn is_invalid_state(result: &Result<impl std::fmt::Debug, SessionError>) -> bool {
    matches!(
        result,
        Err(SessionError::Domain(DomainError::InvalidState { .. }))
    )
}

fn was_narrated(harness: &Harness, wanted: &str) -> bool {
    harness.texts().iter().any(|text| text == wanted)
}

fn position(texts: &[String], wanted: &str) -> usize {
    texts
        .iter()
        .position(|text| text == wanted)
        .unwrap_or_else(|| panic!("{wanted:?} was never narrated: {texts:?}"))
}

fn timed_session_decomposer() -> TableDecomposer {
    TableDecomposer::default().with(
        "Cook",
        vec![
            draft("Simmer", ONE_MINUTE),
            draft("Rest", TWO_MINUTES),
            draft("Plate", "Plate it up."),
        ],
    )
}

#[tokio::test(start_paused = true)]
async fn test_start_numbers_steps_across_outlines_and_narrates_in_order() {
    // Arrange
    let harness = Harness::new();
    let decomposer = TableDecomposer::default()
        .with(
            "Prep",
            vec![
                draft("Rinse", "Rinse the spinach."),
                draft("Dry", "Pat it dry."),
                draft("Chop", "Chop it roughly."),
            ],
        )
        .with(
            "Cook",
            vec![
                draft("Heat", "Heat the pan. [HEAT: 🔥🔥 (Steady)]"),
                draft("Wilt", ONE_MINUTE),
            ],
        );

    // Act
    let session = QuestSession::start(
        quest(&["Prep", "Cook"]),
        harness.deps(decomposer, FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();
    harness.wait_for_text("Alright, Chef! Rinse the spinach.").await;

    // Assert
    let snapshot = session.snapshot().await.unwrap();
    let ids: Vec<u32> = snapshot.steps.iter().map(|step| step.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(snapshot.steps.iter().all(|step| !step.completed));
    assert_eq!(snapshot.phase, QuestPhase::OnStep(0));
    assert_eq!(snapshot.current.unwrap().stage_label, "STAGE 1/5");
    assert_eq!(
        harness.texts(),
        vec![
            PROCESSING.to_owned(),
            "Commencing Quest: The Test Kitchen!".to_owned(),
            "Alright, Chef! Rinse the spinach.".to_owned(),
        ]
    );
    assert_eq!(harness.synthesizer.requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_decomposition_falls_back_for_that_outline_only() {
    let harness = Harness::new();
    let drafts = vec![draft("Rinse", "Rinse the spinach.")];
    let decomposer = TableDecomposer::default().with("Prep", drafts);

    let session = QuestSession::start(
        quest(&["Prep", "Cook"]),
        harness.deps(decomposer, FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();

    let snapshot = session.snapshot().await.unwrap();
    let ids: Vec<u32> = snapshot.steps.iter().map(|step| step.id).collect();
    assert_eq!(ids, (1..=6).collect::<Vec<_>>());
    assert_eq!(snapshot.steps[1].name, "Dice Peppers");
    assert_eq!(snapshot.steps[5].name, "Cook Ground Meat");
}

#[tokio::test(start_paused = true)]
async fn test_quest_without_steps_narrates_failure() {
    // Arrange
    let harness = Harness::new();

    // Act
    let result = QuestSession::start(
        quest(&[]),
        harness.deps(TableDecomposer::default(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await;

    // Assert
    assert_eq!(
        result.unwrap_err(),
        SessionError::Domain(DomainError::EmptyQuest)
    );
    assert_eq!(
        harness.texts(),
        vec![
            PROCESSING.to_owned(),
            "Quest processing failed, Chef! Try another quest!".to_owned(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_demo_run_completes_and_reports_reward_once() {
    // Arrange
    let harness = Harness::new();
    let session = QuestSession::start(
        quest(&["Anything at all"]),
        harness.deps(TableDecomposer::default(), FixedEvaluator::new(graded(10))),
        &demo(),
    )
    .await
    .unwrap();

    // Act
    let photo = Photo::jpeg(vec![0xFF, 0xD8]);
    let evaluation = session.submit_photo(photo).await.unwrap();
    let mut moves = Vec::new();
    for _ in 0..4 {
        moves.push(session.advance(false).await.unwrap());
    }
    let last = session.advance(false).await.unwrap();

    // Assert
    assert_eq!(evaluation.rank, Rank::S);
    assert_eq!(evaluation.xp_bonus, 50);
    assert_eq!(
        moves,
        (1..=4)
            .map(|index| AdvanceOutcome::Moved { index })
            .collect::<Vec<_>>()
    );
    let reward = QuestReward {
        final_xp: 150,
        gold_saved_label: "$7.25".to_owned(),
    };
    assert_eq!(last, AdvanceOutcome::Completed(reward.clone()));
    assert_eq!(harness.rewards.rewards(), vec![reward]);

    harness
        .wait_for_text(
            "Quest completed, Chef! You earned 150 XP and $7.25 gold! Consumed ingredients have been removed from your inventory!",
        )
        .await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, QuestPhase::Complete);
    assert!(snapshot.current.is_none());
    assert!(is_invalid_state(&session.advance(false).await));
    assert!(harness.synthesizer.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_skip_is_narrated_before_the_next_step_and_adds_no_bonus() {
    let harness = Harness::new();
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();
    harness.wait_for_text("Alright, Chef! Simmer the sauce.").await;

    let outcome = session.advance(true).await.unwrap();
    harness.wait_for_text("Alright, Chef! Rest the meat.").await;

    assert_eq!(outcome, AdvanceOutcome::Moved { index: 1 });
    let texts = harness.texts();
    assert!(position(&texts, SKIPPING) < position(&texts, "Alright, Chef! Rest the meat."));
    assert_eq!(session.snapshot().await.unwrap().xp_bonus_accumulated, 0);
}

#[tokio::test(start_paused = true)]
async fn test_timer_counts_down_expires_and_restarts() {
    // Arrange
    let harness = Harness::new();
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();

    // Act
    let started = session.start_timer().await.unwrap();
    tokio::time::sleep(Duration::from_millis(30_500)).await;
    let halfway = session.snapshot().await.unwrap();
    let again = session.start_timer().await.unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;
    harness.wait_for_text(TIME_UP).await;
    let expired = session.snapshot().await.unwrap();
    session.restart_timer().await.unwrap();

    // Assert
    assert_eq!(started, StartOutcome::Started);
    assert_eq!(again, StartOutcome::AlreadyRunning);
    assert_eq!(halfway.timer.remaining_seconds, 30);
    assert_eq!(halfway.countdown, "00:30");
    assert_eq!(expired.timer.remaining_seconds, 0);
    assert_eq!(expired.timer.phase, TimerPhase::Expired);
    harness.wait_for_text("Timer restarted, Chef!").await;
    let restarted = session.snapshot().await.unwrap();
    assert_eq!(restarted.timer.remaining_seconds, 60);
    assert_eq!(restarted.timer.phase, TimerPhase::Running);
    let started_lines = harness
        .texts()
        .iter()
        .filter(|text| *text == "Timer started, Chef!")
        .count();
    assert_eq!(started_lines, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_the_remaining_time() {
    let harness = Harness::new();
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();

    session.start_timer().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    session.pause_timer().await.unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.timer.remaining_seconds, 50);
    assert_eq!(snapshot.timer.phase, TimerPhase::Stopped);
    harness.wait_for_text("Timer paused, Chef.").await;
    assert!(is_invalid_state(&session.pause_timer().await));
}

#[tokio::test(start_paused = true)]
async fn test_step_without_timer_cannot_start_one() {
    let harness = Harness::new();
    let drafts = vec![draft("Plate", "Plate it up.")];
    let decomposer = TableDecomposer::default().with("Cook", drafts);
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(decomposer, FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();

    assert!(is_invalid_state(&session.start_timer().await));
    assert_eq!(session.snapshot().await.unwrap().countdown, "00:00");
}

#[tokio::test(start_paused = true)]
async fn test_advancing_mid_countdown_rearms_for_the_next_step() {
    // Arrange
    let harness = Harness::new();
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();
    session.start_timer().await.unwrap();
    tokio::time::sleep(Duration::from_millis(5_500)).await;

    // Act
    session.advance(false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    // Assert
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.timer.remaining_seconds, 120);
    assert_eq!(snapshot.timer.phase, TimerPhase::Stopped);
    assert_eq!(snapshot.countdown, "02:00");
    assert!(!was_narrated(&harness, TIME_UP));
}

#[tokio::test(start_paused = true)]
async fn test_evaluation_for_a_step_already_left_is_discarded() {
    // Arrange
    let harness = Harness::new();
    let evaluator = FixedEvaluator::new(graded(25)).delayed(Duration::from_secs(10));
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), evaluator),
        &interactive(),
    )
    .await
    .unwrap();

    // Act
    let submitter = session.clone();
    let photo = Photo::jpeg(vec![1, 2, 3]);
    let pending = tokio::spawn(async move { submitter.submit_photo(photo).await });
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.advance(false).await.unwrap();
    let result = pending.await.unwrap();

    // Assert
    assert!(is_invalid_state(&result));
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.xp_bonus_accumulated, 0);
    assert_eq!(snapshot.pending_evaluation, None);
    assert!(was_narrated(&harness, ANALYZING));
    assert!(!was_narrated(&harness, "Splendid work, Chef!"));
}

#[tokio::test(start_paused = true)]
async fn test_evaluation_speaks_feedback_then_safety_alert() {
    // Arrange
    let harness = Harness::new();
    let hazard = EvaluationResult {
        rank: Rank::D,
        feedback: "Wash the board after raw chicken.".to_owned(),
        xp_bonus: 0,
        safety_alert: Some("Safety Hazard: Cross-contamination".to_owned()),
        cdm_speech: "WARNING, CHEF! Cross-contamination Please review the safety advice!"
            .to_owned(),
    };
    let evaluator = FixedEvaluator::new(hazard.clone());
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), evaluator),
        &interactive(),
    )
    .await
    .unwrap();

    // Act
    let result = session.submit_photo(Photo::jpeg(vec![9])).await.unwrap();
    harness.wait_for_text("Safety Hazard: Cross-contamination").await;

    // Assert
    assert_eq!(result, hazard);
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.pending_evaluation, Some(0));
    let texts = harness.texts();
    let analyzing = position(&texts, ANALYZING);
    let speech = position(&texts, &hazard.cdm_speech);
    let alert = position(&texts, "Safety Hazard: Cross-contamination");
    assert!(analyzing < speech && speech < alert);
}

#[tokio::test(start_paused = true)]
async fn test_abandon_clears_the_timer_and_ends_the_run() {
    // Arrange
    let harness = Harness::new();
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();
    session.start_timer().await.unwrap();

    // Act
    session.abandon().await.unwrap();
    tokio::time::sleep(Duration::from_secs(90)).await;

    // Assert
    harness.wait_for_text(ABANDONING).await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, QuestPhase::Abandoned);
    assert_eq!(snapshot.timer.phase, TimerPhase::Stopped);
    assert!(!was_narrated(&harness, TIME_UP));
    assert!(is_invalid_state(&session.abandon().await));
    assert!(is_invalid_state(&session.start_timer().await));
    assert!(harness.rewards.rewards().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_silences_the_speaker() {
    // Arrange
    let synthesizer = ScriptedSynthesizer::new();
    synthesizer.push(Ok(None));
    synthesizer.push(Ok(None));
    let harness = Harness::with_synthesizer(synthesizer);
    let session = QuestSession::start(
        quest(&["Cook"]),
        harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10))),
        &interactive(),
    )
    .await
    .unwrap();
    wait_until(|| harness.audio.playing() == vec![1]).await;
    let spare = session.clone();

    // Act
    drop(session);
    tokio::time::sleep(Duration::from_millis(5)).await;
    let still_open = !spare.is_closed() && harness.audio.playing() == vec![1];
    drop(spare);

    // Assert
    assert!(still_open);
    wait_until(|| harness.audio.events().contains(&AudioEvent::Stopped(1))).await;
    assert!(harness.audio.playing().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_narration_failures_never_fail_the_session() {
    // Arrange
    let harness = Harness::new();
    let mut deps = harness.deps(timed_session_decomposer(), FixedEvaluator::new(graded(10)));
    deps.audio = Arc::new(AudioResource::uninitialized());

    // Act
    let session = QuestSession::start(quest(&["Cook"]), deps, &interactive())
        .await
        .unwrap();
    let spoken = NarrationRequest::spoken("Hello, Chef!");
    let spoken = session.narrate(spoken).await;
    let logged = NarrationRequest::logged("Noted, Chef.");
    let logged = session.narrate(logged).await;

    // Assert
    assert_eq!(
        spoken,
        Err(SessionError::Narration(NarrationError::Audio(AudioError::Unavailable)))
    );
    assert_eq!(logged, Ok(NarrationOutcome::LogOnly));
    assert_eq!(
        session.advance(false).await,
        Ok(AdvanceOutcome::Moved { index: 1 })
    );
    assert!(was_narrated(&harness, PROCESSING));
}
