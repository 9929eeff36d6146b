use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8777;
pub const DEFAULT_RESPONSE_TEXT: &str = "Hello, this is an automated response";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub synthesis: SynthesisConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    pub base_url: String,
    #[serde(default)]
    pub model_id: Option<String>,
    pub output_format: String,
    pub stability: f64,
    pub similarity_boost: f64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub default_response_text: String,
}

/// Provider credentials, guaranteed non-blank
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub voice_id: String,
}

impl Config {
    /// Load defaults, then `path` (if it exists), then the process environment.
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] but with an explicit environment lookup.
    pub fn load_with_env(path: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", DEFAULT_PORT as i64)?
            .set_default("synthesis.base_url", "https://api.elevenlabs.io")?
            .set_default("synthesis.output_format", "mp3_44100_128")?
            .set_default("synthesis.stability", 0.5)?
            .set_default("synthesis.similarity_boost", 0.75)?
            .set_default("synthesis.timeout_secs", 30i64)?
            .set_default("session.default_response_text", DEFAULT_RESPONSE_TEXT)?
            .add_source(config::File::with_name(path).required(false))
            .set_override_option("server.bind", env("BRIDGE_BIND"))?
            .set_override_option("server.port", env("WEBSOCKET_PORT"))?
            .set_override_option("synthesis.api_key", env("ELEVENLABS_API_KEY"))?
            .set_override_option("synthesis.voice_id", env("ELEVENLABS_VOICE_ID"))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl SynthesisConfig {
    /// Resolve provider credentials, failing if either is missing or blank.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let api_key = non_blank(&self.api_key).ok_or(ConfigError::MissingCredential("ELEVENLABS_API_KEY"))?;
        let voice_id = non_blank(&self.voice_id).ok_or(ConfigError::MissingCredential("ELEVENLABS_VOICE_ID"))?;

        Ok(Credentials { api_key, voice_id })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
