//! Console stand-in for the speech recognizer
//!
//! Lines typed on stdin play the part of final transcripts. An empty line
//! presses the talk/stop button; `/quit` or end of input closes the session.
//!
//! Every non-empty line is forwarded in input order. The assistant decides
//! whether it arrived while listening, so piped input that races ahead of
//! the toggle it just sent is not lost.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use super::adapter::{AdapterEvent, VoiceAdapter};
use super::assistant::AssistantEvent;
use crate::Result;

/// Recognizer whose "microphone" is a line-oriented reader
#[derive(Debug, Clone, Default)]
pub struct ConsoleAdapter {
    listening: Arc<AtomicBool>,
}

impl ConsoleAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Read lines from `input` and turn them into assistant events
    ///
    /// Returns when input ends, `/quit` is read, or the receiver is gone.
    /// Dropping `events` afterwards lets the assistant's loop finish.
    pub async fn feed<R>(&self, input: R, events: mpsc::UnboundedSender<AssistantEvent>)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "console input failed");
                    let _ = events.send(AssistantEvent::Adapter(AdapterEvent::Error(
                        e.to_string(),
                    )));
                    return;
                }
            };

            let line = line.trim();
            let event = if line == "/quit" {
                break;
            } else if line.is_empty() {
                AssistantEvent::Toggle
            } else {
                AssistantEvent::Adapter(AdapterEvent::FinalTranscript(line.to_string()))
            };

            if events.send(event).is_err() {
                return;
            }
        }

        // ignored by the assistant unless it is listening
        let _ = events.send(AssistantEvent::Adapter(AdapterEvent::StreamEnd));
    }
}

impl VoiceAdapter for ConsoleAdapter {
    fn begin(&mut self) -> Result<()> {
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn end(&mut self) {
        self.listening.store(false, Ordering::SeqCst);
    }
}
