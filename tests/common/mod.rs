//! Shared test utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use talking_friend::api::ApiState;
use talking_friend::brain::{ResponseEngine, SequencePicker};
use talking_friend::voice::{Speaker, Synthesizer, VoiceAdapter};
use talking_friend::{Error, Result};

/// Adapter that counts begin/end calls
#[derive(Debug, Default, Clone)]
pub struct RecordingAdapter {
    begins: Arc<AtomicUsize>,
    ends: Arc<AtomicUsize>,
}

impl RecordingAdapter {
    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }
}

impl VoiceAdapter for RecordingAdapter {
    fn begin(&mut self) -> Result<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn end(&mut self) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }
}

/// Speaker that remembers what it said
#[derive(Debug, Default, Clone)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Canned synthesizer outcome
#[derive(Debug, Clone)]
pub enum Canned {
    Audio(Vec<u8>),
    Upstream(u16, String),
    Internal(String),
}

/// Synthesizer returning a canned outcome and recording its calls
#[derive(Debug)]
pub struct StubSynthesizer {
    outcome: Canned,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl StubSynthesizer {
    pub fn new(outcome: Canned) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), voice_id.map(ToString::to_string)));

        match &self.outcome {
            Canned::Audio(bytes) => Ok(bytes.clone()),
            Canned::Upstream(status, body) => Err(Error::Upstream {
                status: *status,
                body: body.clone(),
            }),
            Canned::Internal(message) => Err(Error::Tts(message.clone())),
        }
    }
}

/// Build API state around a synthesizer, with deterministic replies
pub fn test_state(synthesizer: Arc<dyn Synthesizer>) -> Arc<ApiState> {
    Arc::new(ApiState {
        synthesizer,
        engine: Arc::new(ResponseEngine::new().with_picker(SequencePicker::new(vec![0]))),
        tts_configured: true,
        static_dir: None,
    })
}

/// Serve a router on an ephemeral local port, returning its base URL
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    format!("http://{addr}")
}
