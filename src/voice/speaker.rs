//! Speech output capability

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::{Error, Result};

/// Speaks a reply; resolves once speech has ended
#[async_trait]
pub trait Speaker: Send + Sync {
    /// # Errors
    ///
    /// Returns error if the reply could not be spoken
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Prints replies to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeaker;

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        println!("🔊 {text}");
        Ok(())
    }
}

/// Sends replies through a running `/speak` proxy and saves the audio
pub struct ProxySpeaker {
    client: reqwest::Client,
    speak_url: String,
    voice_id: Option<String>,
    out_dir: PathBuf,
    counter: AtomicU64,
}

impl ProxySpeaker {
    /// # Arguments
    ///
    /// * `base_url` - Proxy address, e.g. `http://localhost:3001`
    /// * `out_dir` - Directory receiving `reply-N.mp3` files
    #[must_use]
    pub fn new(base_url: &str, voice_id: Option<String>, out_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            speak_url: format!("{}/speak", base_url.trim_end_matches('/')),
            voice_id,
            out_dir,
            counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Speaker for ProxySpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        #[derive(serde::Serialize)]
        struct SpeakRequest<'a> {
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            voice_id: Option<&'a str>,
        }

        println!("🔊 {text}");

        let response = self
            .client
            .post(&self.speak_url)
            .json(&SpeakRequest {
                text,
                voice_id: self.voice_id.as_deref(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream { status, body });
        }

        let audio = response.bytes().await?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join(format!("reply-{n}.mp3"));
        tokio::fs::write(&path, &audio).await?;

        tracing::info!(path = %path.display(), bytes = audio.len(), "saved reply audio");
        Ok(())
    }
}
