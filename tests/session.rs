//! Recording session and assistant timing, on a paused clock

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use talking_friend::brain::{FixedClock, SequencePicker};
use talking_friend::voice::{
    AdapterEvent, ConsoleAdapter, SessionState, Status, TimerEvent, TimerOutcome,
};
use talking_friend::{
    Assistant, AssistantEvent, Error, RecordingSession, ResponseEngine, Result, VoiceAdapter,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

mod common;
use common::{RecordingAdapter, RecordingSpeaker};

const MAX: Duration = Duration::from_millis(15_000);

/// Collect whatever the session still emits within `window`
async fn drain<A: VoiceAdapter>(
    session: &mut RecordingSession<A>,
    window: Duration,
) -> Vec<(TimerEvent, TimerOutcome)> {
    let mut seen = Vec::new();
    while let Ok(event) = tokio::time::timeout(window, session.next_timer_event()).await {
        seen.push((event, session.on_timer(event)));
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_auto_stop_at_deadline() {
    let adapter = RecordingAdapter::default();
    let mut session = RecordingSession::new(adapter.clone(), MAX);
    let started = Instant::now();

    assert!(session.start().unwrap());
    assert_eq!(session.remaining_secs(), 15);
    assert_eq!(session.deadline(), Some(started + MAX));

    let mut countdown = Vec::new();
    loop {
        let event = session.next_timer_event().await;
        match session.on_timer(event) {
            TimerOutcome::Ticked { remaining_secs } => countdown.push(remaining_secs),
            TimerOutcome::Expired => break,
            TimerOutcome::Stale => panic!("unexpected stale event {event:?}"),
        }
    }

    assert_eq!(started.elapsed(), MAX);
    assert_eq!(&countdown[..14], &(1..=14).rev().collect::<Vec<u64>>()[..]);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.has_live_timers());
    assert_eq!(adapter.begins(), 1);
    assert_eq!(adapter.ends(), 1);

    let late = drain(&mut session, Duration::from_secs(5)).await;
    assert!(late.iter().all(|(_, outcome)| *outcome == TimerOutcome::Stale));
    assert_eq!(adapter.ends(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_second_start_keeps_one_timer_pair() {
    let adapter = RecordingAdapter::default();
    let mut session = RecordingSession::new(adapter.clone(), MAX);

    assert!(session.start().unwrap());
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!session.start().unwrap());

    assert_eq!(session.generation(), 1);
    assert_eq!(adapter.begins(), 1);

    let events = drain(&mut session, Duration::from_secs(20)).await;
    let expired = events
        .iter()
        .filter(|(_, outcome)| *outcome == TimerOutcome::Expired)
        .count();
    assert_eq!(expired, 1);
    assert!(events.iter().all(|(event, _)| {
        matches!(
            event,
            TimerEvent::Tick { generation: 1 } | TimerEvent::Deadline { generation: 1 }
        )
    }));
    assert_eq!(adapter.ends(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_when_idle_is_a_no_op() {
    let adapter = RecordingAdapter::default();
    let mut session = RecordingSession::new(adapter.clone(), MAX);

    assert!(!session.stop());
    assert_eq!(adapter.ends(), 0);

    assert!(session.start().unwrap());
    assert!(session.stop());
    assert!(!session.stop());
    assert_eq!(adapter.ends(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_deadline_silences_timers() {
    let adapter = RecordingAdapter::default();
    let mut session = RecordingSession::new(adapter.clone(), MAX);

    assert!(session.start().unwrap());
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(session.stop());

    let events = drain(&mut session, Duration::from_secs(30)).await;
    assert!(events.iter().all(|(_, outcome)| *outcome == TimerOutcome::Stale));
    assert_eq!(adapter.ends(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_gets_a_fresh_deadline() {
    let adapter = RecordingAdapter::default();
    let mut session = RecordingSession::new(adapter.clone(), MAX);

    assert!(session.start().unwrap());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(session.stop());

    let restarted = Instant::now();
    assert!(session.start().unwrap());
    assert_eq!(session.generation(), 2);

    loop {
        let event = session.next_timer_event().await;
        if session.on_timer(event) == TimerOutcome::Expired {
            break;
        }
    }

    assert_eq!(restarted.elapsed(), MAX);
    assert_eq!(adapter.begins(), 2);
    assert_eq!(adapter.ends(), 2);
}

struct BrokenMic;

impl VoiceAdapter for BrokenMic {
    fn begin(&mut self) -> Result<()> {
        Err(Error::Adapter("not-allowed".to_string()))
    }

    fn end(&mut self) {}
}

#[tokio::test(start_paused = true)]
async fn test_failed_begin_stays_idle() {
    let mut session = RecordingSession::new(BrokenMic, MAX);

    assert!(session.start().is_err());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.has_live_timers());
    assert_eq!(session.generation(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_assistant_turn_then_auto_stop() {
    let adapter = RecordingAdapter::default();
    let speaker = RecordingSpeaker::default();
    let engine = ResponseEngine::new().with_picker(SequencePicker::new(vec![0]));

    let mut assistant = Assistant::new(
        RecordingSession::new(adapter.clone(), MAX),
        Arc::new(engine),
        Arc::new(speaker.clone()),
    );
    let mut display = assistant.subscribe();

    let (tx, rx) = mpsc::unbounded_channel();
    let script = async move {
        tx.send(AssistantEvent::Toggle).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        tx.send(AssistantEvent::Adapter(AdapterEvent::FinalTranscript(
            "What is 6 times 7".to_string(),
        )))
        .unwrap();
        tokio::time::sleep(Duration::from_secs(14)).await;
        drop(tx);
    };

    tokio::join!(assistant.run(rx), script);

    assert_eq!(speaker.spoken(), vec!["The answer is 42.".to_string()]);
    assert_eq!(adapter.begins(), 1);
    assert_eq!(adapter.ends(), 1);

    let last = display.borrow_and_update().clone();
    assert_eq!(last.status, Status::Ready);
    assert_eq!(last.button, "🎤 Talk");
    assert_eq!(last.heard.as_deref(), Some("What is 6 times 7"));
    assert_eq!(last.reply.as_deref(), Some("The answer is 42."));
    assert_eq!(assistant.pending_speech(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_assistant_stops_when_input_closes() {
    let adapter = RecordingAdapter::default();
    let mut assistant = Assistant::new(
        RecordingSession::new(adapter.clone(), MAX),
        Arc::new(ResponseEngine::new()),
        Arc::new(RecordingSpeaker::default()),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(AssistantEvent::Toggle).unwrap();
    drop(tx);

    let started = Instant::now();
    assistant.run(rx).await;

    assert!(started.elapsed() < MAX);
    assert!(!assistant.session().is_listening());
    assert_eq!(adapter.ends(), 1);
    assert_eq!(assistant.display().status, Status::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_piped_console_input_reaches_the_assistant() {
    let adapter = ConsoleAdapter::new();
    let speaker = RecordingSpeaker::default();
    let now = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(15, 4, 5)
        .unwrap();
    let engine = ResponseEngine::new()
        .with_picker(SequencePicker::new(vec![0]))
        .with_clock(FixedClock(now));

    let mut assistant = Assistant::new(
        RecordingSession::new(adapter.clone(), MAX),
        Arc::new(engine),
        Arc::new(speaker.clone()),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::join!(
        assistant.run(rx),
        adapter.feed(&b"\nwhat time is it\n"[..], tx)
    );

    assert_eq!(assistant.display().heard.as_deref(), Some("what time is it"));
    assert_eq!(speaker.spoken(), vec!["It's 3:04:05 PM.".to_string()]);
    assert!(!adapter.is_listening());
    assert_eq!(assistant.display().status, Status::Ready);
}
