//! Talking Friend - a tiny voice assistant
//!
//! This library provides:
//! - A rule-based reply engine (greetings, time, jokes, arithmetic, ...)
//! - The recording session lifecycle with countdown and auto-stop
//! - An assistant controller driven by speech recognition events
//! - A text-to-speech proxy for a remote provider
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  transcript  ┌──────────────┐  reply  ┌────────────┐
//! │ VoiceAdapter ├─────────────►│  Assistant   ├────────►│  Speaker   │
//! │ (recognizer) │◄─────────────┤ + Recording  │         │ (local or  │
//! └──────────────┘  begin/end   │   Session    │         │  /speak)   │
//!                               └──────┬───────┘         └─────┬──────┘
//!                                      │ respond               │
//!                               ┌──────▼───────┐         ┌─────▼──────┐
//!                               │ResponseEngine│         │ TTS proxy  │
//!                               └──────────────┘         │ ElevenLabs │
//!                                                        └────────────┘
//! ```

pub mod api;
pub mod brain;
pub mod config;
pub mod error;
pub mod voice;

pub use brain::{Intent, Reply, ResponseEngine};
pub use config::Config;
pub use error::{Error, Result};
pub use voice::{Assistant, AssistantEvent, RecordingSession, VoiceAdapter};
