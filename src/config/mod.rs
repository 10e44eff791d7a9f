//! Configuration management for the assistant
//!
//! Values resolve in order: environment, then the TOML config file, then defaults.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::brain::CustomRule;
use file::ConfigFile;

/// Default listening port
pub const DEFAULT_PORT: u16 = 3001;

/// Default `ElevenLabs` voice ("Rachel")
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Default `ElevenLabs` model
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// Default `ElevenLabs` API base URL
pub const DEFAULT_TTS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Default auto-stop deadline for a recording session
pub const DEFAULT_MAX_RECORD_MS: u64 = 15_000;

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// TTS provider configuration
    pub tts: TtsConfig,

    /// Recording session configuration
    pub session: SessionConfig,

    /// Custom intent rules from the config file
    pub rules: Vec<CustomRule>,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Directory holding the web UI assets
    pub static_dir: PathBuf,
}

/// `ElevenLabs` TTS configuration
#[derive(Clone)]
pub struct TtsConfig {
    /// Provider API key (from `ELEVENLABS_API_KEY`)
    pub api_key: Option<String>,

    /// Voice used when a request doesn't name one
    pub voice_id: String,

    /// Synthesis model
    pub model_id: String,

    /// Provider base URL, without trailing slash
    pub base_url: String,
}

impl std::fmt::Debug for TtsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_TTS_BASE_URL.to_string(),
        }
    }
}

/// Recording session configuration
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Session is stopped automatically after this long
    pub max_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_millis(DEFAULT_MAX_RECORD_MS),
        }
    }
}

impl Config {
    /// Load configuration from the process environment and the standard config file
    #[must_use]
    pub fn load() -> Self {
        let fc = file::load_config_file();
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed config file and an environment lookup
    #[must_use]
    pub fn from_sources(fc: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let server = ServerConfig {
            port: non_empty("PORT")
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
            static_dir: non_empty("TALKING_FRIEND_STATIC_DIR")
                .or(fc.server.static_dir)
                .map_or_else(|| PathBuf::from("public"), PathBuf::from),
        };

        let tts = TtsConfig {
            api_key: non_empty("ELEVENLABS_API_KEY").or(fc.tts.api_key),
            voice_id: non_empty("ELEVENLABS_VOICE_ID")
                .or(fc.tts.voice_id)
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            model_id: non_empty("ELEVENLABS_MODEL_ID")
                .or(fc.tts.model_id)
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            base_url: non_empty("ELEVENLABS_BASE_URL")
                .or(fc.tts.base_url)
                .unwrap_or_else(|| DEFAULT_TTS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        let max_record_ms = non_empty("TALKING_FRIEND_MAX_RECORD_MS")
            .and_then(|s| s.parse().ok())
            .or(fc.session.max_record_ms)
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_MAX_RECORD_MS);

        if tts.api_key.is_none() {
            tracing::warn!("ELEVENLABS_API_KEY not set, /speak requests will be rejected upstream");
        }

        Self {
            server,
            tts,
            session: SessionConfig {
                max_duration: Duration::from_millis(max_record_ms),
            },
            rules: fc.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(ConfigFile::default(), env_of(&[]));

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.static_dir, PathBuf::from("public"));
        assert!(config.tts.api_key.is_none());
        assert_eq!(config.tts.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(config.tts.model_id, "eleven_multilingual_v2");
        assert_eq!(config.tts.base_url, "https://api.elevenlabs.io");
        assert_eq!(config.session.max_duration, Duration::from_millis(15_000));
    }

    #[test]
    fn test_env_overrides_file() {
        let fc = file::parse_config_file(
            r#"
            [server]
            port = 8080

            [tts]
            api_key = "from-file"
            voice_id = "file-voice"
            "#,
        )
        .unwrap();

        let config = Config::from_sources(
            fc,
            env_of(&[
                ("PORT", "9000"),
                ("ELEVENLABS_API_KEY", "from-env"),
                ("ELEVENLABS_BASE_URL", "http://127.0.0.1:4000/"),
                ("TALKING_FRIEND_MAX_RECORD_MS", "2500"),
            ]),
        );

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.tts.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.tts.voice_id, "file-voice");
        assert_eq!(config.tts.base_url, "http://127.0.0.1:4000");
        assert_eq!(config.session.max_duration, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_sources(
            ConfigFile::default(),
            env_of(&[
                ("PORT", "not-a-port"),
                ("ELEVENLABS_API_KEY", "   "),
                ("TALKING_FRIEND_MAX_RECORD_MS", "0"),
            ]),
        );

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.tts.api_key.is_none());
        assert_eq!(config.session.max_duration, Duration::from_millis(15_000));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let tts = TtsConfig {
            api_key: Some("secret-key".to_string()),
            ..TtsConfig::default()
        };
        let printed = format!("{tts:?}");
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("REDACTED"));
    }
}
