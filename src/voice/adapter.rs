//! Speech recognition capability
//!
//! The platform recognizer (browser Web Speech API, a local STT engine, or a
//! console stand-in) is consumed through [`VoiceAdapter`]. Starting and
//! stopping are direct calls; results come back as [`AdapterEvent`]s on the
//! channel the adapter was built with.

use crate::Result;

/// Event emitted by a speech recognition adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// A final (never interim) transcript
    FinalTranscript(String),
    /// Recognition failed; the reason is shown to the user
    Error(String),
    /// The recognizer stopped on its own
    StreamEnd,
}

/// Start/stop control over a speech recognizer
pub trait VoiceAdapter: Send {
    /// Begin capturing speech
    ///
    /// # Errors
    ///
    /// Returns `Error::Adapter` if the recognizer cannot start
    fn begin(&mut self) -> Result<()>;

    /// Stop capturing speech
    fn end(&mut self);
}

impl<T: VoiceAdapter + ?Sized> VoiceAdapter for Box<T> {
    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn end(&mut self) {
        (**self).end();
    }
}
