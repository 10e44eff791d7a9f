//! Assistant controller
//!
//! Owns the recording session, the reply engine and the speaker, and
//! applies events one at a time: user toggles, adapter callbacks, timer
//! fires and speech completions. UI-observable state is published as a
//! [`Display`] on a watch channel.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::adapter::{AdapterEvent, VoiceAdapter};
use super::session::{RecordingSession, TimerEvent, TimerOutcome};
use super::speaker::Speaker;
use crate::brain::ResponseEngine;
use crate::Error;

/// Input to the assistant controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// The talk/stop button was pressed
    Toggle,
    /// Callback from the speech recognizer
    Adapter(AdapterEvent),
}

/// Status line shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Listening,
    Thinking,
    Talking,
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::Listening => f.write_str("Listening…"),
            Self::Thinking => f.write_str("Thinking…"),
            Self::Talking => f.write_str("Talking…"),
            Self::Error(reason) => f.write_str(reason),
        }
    }
}

/// Everything the UI shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pub status: Status,
    /// Last transcript
    pub heard: Option<String>,
    /// Last reply
    pub reply: Option<String>,
    /// Talk button label, with countdown while listening
    pub button: String,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            status: Status::Ready,
            heard: None,
            reply: None,
            button: talk_label(),
        }
    }
}

fn talk_label() -> String {
    "🎤 Talk".to_string()
}

fn stop_label(remaining_secs: u64) -> String {
    format!("⏹ Stop ({remaining_secs}s)")
}

/// Result of one spoken reply
struct SpeechOutcome {
    id: u64,
    result: crate::Result<()>,
}

/// Voice assistant controller
pub struct Assistant<A> {
    session: RecordingSession<A>,
    engine: Arc<ResponseEngine>,
    speaker: Arc<dyn Speaker>,
    display: watch::Sender<Display>,
    speech_tx: mpsc::UnboundedSender<SpeechOutcome>,
    speech_rx: mpsc::UnboundedReceiver<SpeechOutcome>,
    last_reply_id: u64,
    pending_speech: usize,
}

impl<A: VoiceAdapter> Assistant<A> {
    #[must_use]
    pub fn new(
        session: RecordingSession<A>,
        engine: Arc<ResponseEngine>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        Self {
            session,
            engine,
            speaker,
            display: watch::Sender::new(Display::default()),
            speech_tx,
            speech_rx,
            last_reply_id: 0,
            pending_speech: 0,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &RecordingSession<A> {
        &self.session
    }

    /// Snapshot of the current display
    #[must_use]
    pub fn display(&self) -> Display {
        self.display.borrow().clone()
    }

    /// Follow display changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Display> {
        self.display.subscribe()
    }

    /// Replies still being spoken
    #[must_use]
    pub const fn pending_speech(&self) -> usize {
        self.pending_speech
    }

    /// Process events until the sender side closes
    ///
    /// On exit the session is stopped and in-flight speech is allowed to finish.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<AssistantEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                timer = self.session.next_timer_event() => self.handle_timer(timer),
                Some(outcome) = self.speech_rx.recv() => self.handle_speech(outcome),
            }
        }

        if self.session.stop() {
            self.set_idle(Status::Ready);
        }

        while self.pending_speech > 0 {
            match self.speech_rx.recv().await {
                Some(outcome) => self.handle_speech(outcome),
                None => break,
            }
        }

        tracing::debug!("assistant event loop finished");
    }

    /// Apply a user or adapter event
    pub fn handle(&mut self, event: AssistantEvent) {
        tracing::trace!(?event, "assistant event");
        match event {
            AssistantEvent::Toggle => self.toggle(),
            AssistantEvent::Adapter(AdapterEvent::FinalTranscript(text)) => {
                if self.session.is_listening() {
                    self.reply_to(text);
                } else {
                    tracing::debug!("transcript arrived while idle, ignored");
                }
            }
            AssistantEvent::Adapter(AdapterEvent::Error(reason)) => {
                tracing::warn!(%reason, "speech recognition error");
                self.session.stop();
                self.set_idle(Status::Error(format!("Mic error: {reason}")));
            }
            AssistantEvent::Adapter(AdapterEvent::StreamEnd) => {
                if self.session.stop() {
                    self.set_idle(Status::Ready);
                }
            }
        }
    }

    /// Apply a timer event from the session
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match self.session.on_timer(event) {
            TimerOutcome::Stale => {}
            TimerOutcome::Ticked { remaining_secs } => {
                if remaining_secs > 0 {
                    self.display
                        .send_modify(|d| d.button = stop_label(remaining_secs));
                }
            }
            TimerOutcome::Expired => self.set_idle(Status::Ready),
        }
    }

    /// Start when idle, stop when listening
    fn toggle(&mut self) {
        if self.session.is_listening() {
            self.session.stop();
            self.set_idle(Status::Ready);
            return;
        }

        match self.session.start() {
            Ok(_) => {
                let remaining = self.session.remaining_secs();
                self.display.send_modify(|d| {
                    d.heard = None;
                    d.reply = None;
                    d.status = Status::Listening;
                    d.button = stop_label(remaining);
                });
            }
            Err(e) => {
                let reason = match e {
                    Error::Adapter(reason) => reason,
                    other => other.to_string(),
                };
                tracing::warn!(%reason, "could not start listening");
                self.set_idle(Status::Error(format!("Mic error: {reason}")));
            }
        }
    }

    fn reply_to(&mut self, transcript: String) {
        self.display.send_modify(|d| {
            d.heard = Some(transcript.clone());
            d.status = Status::Thinking;
        });

        let reply = self.engine.respond(&transcript);
        tracing::info!(intent = %reply.intent, "reply computed");

        self.display.send_modify(|d| {
            d.reply = Some(reply.text.clone());
            d.status = Status::Talking;
        });

        self.last_reply_id += 1;
        self.pending_speech += 1;
        let id = self.last_reply_id;
        let speaker = Arc::clone(&self.speaker);
        let tx = self.speech_tx.clone();
        tokio::spawn(async move {
            let result = speaker.speak(&reply.text).await;
            let _ = tx.send(SpeechOutcome { id, result });
        });
    }

    fn handle_speech(&mut self, outcome: SpeechOutcome) {
        self.pending_speech = self.pending_speech.saturating_sub(1);

        if let Err(e) = &outcome.result {
            tracing::error!(error = %e, reply = outcome.id, "speech failed");
        }

        if outcome.id != self.last_reply_id {
            tracing::debug!(reply = outcome.id, "speech finished for an older reply");
            return;
        }

        let status = match outcome.result {
            Err(e) => Status::Error(format!("Error: {e}")),
            Ok(()) if self.session.is_listening() => Status::Listening,
            Ok(()) => Status::Ready,
        };
        self.display.send_modify(|d| d.status = status);
    }

    fn set_idle(&self, status: Status) {
        self.display.send_modify(|d| {
            d.status = status;
            d.button = talk_label();
        });
    }
}
