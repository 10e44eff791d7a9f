//! TOML configuration file loading
//!
//! Supports `~/.config/talking-friend/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::brain::CustomRule;
use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Text-to-speech provider configuration
    #[serde(default)]
    pub tts: TtsFileConfig,

    /// Recording session configuration
    #[serde(default)]
    pub session: SessionFileConfig,

    /// Extra intent rules, tried after the built-in ones
    #[serde(default)]
    pub rules: Vec<CustomRule>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port to listen on
    pub port: Option<u16>,

    /// Directory holding the web UI assets
    pub static_dir: Option<String>,
}

/// `ElevenLabs` provider configuration
#[derive(Debug, Default, Deserialize)]
pub struct TtsFileConfig {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub base_url: Option<String>,
}

/// Recording session configuration
#[derive(Debug, Default, Deserialize)]
pub struct SessionFileConfig {
    /// Auto-stop deadline in milliseconds
    pub max_record_ms: Option<u64>,
}

/// Parse a config file from TOML text
///
/// # Errors
///
/// Returns error if the text is not valid TOML for this schema
pub fn parse_config_file(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConfigFile {
    config_file_path().map_or_else(ConfigFile::default, |path| load_config_file_from(&path))
}

/// Load the TOML config file from an explicit path
///
/// Same fallback behavior as [`load_config_file`].
pub fn load_config_file_from(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/talking-friend/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.config_dir().join("talking-friend").join("config.toml"))
}
