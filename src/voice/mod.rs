//! Voice module
//!
//! Recording session lifecycle, the assistant controller that ties speech
//! recognition to replies, speech output, and the TTS provider client.

mod adapter;
mod assistant;
mod console;
mod session;
mod speaker;
mod tts;

pub use adapter::{AdapterEvent, VoiceAdapter};
pub use assistant::{Assistant, AssistantEvent, Display, Status};
pub use console::ConsoleAdapter;
pub use session::{RecordingSession, SessionState, TimerEvent, TimerOutcome};
pub use speaker::{ConsoleSpeaker, ProxySpeaker, Speaker};
pub use tts::{ElevenLabsTts, Synthesizer};
