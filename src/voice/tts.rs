//! Text-to-speech (TTS) provider client

use async_trait::async_trait;

use crate::config::TtsConfig;
use crate::{Error, Result};

/// Turns text into MP3 audio
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text`, optionally with a specific voice
    ///
    /// # Errors
    ///
    /// Returns `Error::Upstream` when the provider rejects the request and
    /// `Error::Http` when it can't be reached
    async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>>;
}

/// `ElevenLabs` text-to-speech client
pub struct ElevenLabsTts {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
}

impl ElevenLabsTts {
    /// Create a client from configuration
    ///
    /// A missing key is allowed; the provider then answers each request
    /// with its own authentication error, which is passed through.
    #[must_use]
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone().unwrap_or_default(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Voice used when a request doesn't name one
    #[must_use]
    pub fn default_voice(&self) -> &str {
        &self.voice_id
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsTts {
    async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let voice = voice_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(&self.voice_id);
        let url = format!("{}/v1/text-to-speech/{voice}", self.base_url);

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model_id,
        };

        tracing::debug!(voice, chars = text.len(), "requesting speech synthesis");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream { status, body });
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}
