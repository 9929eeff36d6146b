use std::time::Duration;

use crate::config::{Config, DEFAULT_RESPONSE_TEXT};

/// Per-call behaviour, shared by every session a server creates
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Spoken when a media frame carries no `parameters.response_text`
    pub default_response_text: String,

    /// Upper bound on one synthesis round-trip
    pub synthesis_timeout: Duration,
}

impl SessionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_response_text: config.session.default_response_text.clone(),
            synthesis_timeout: config.synthesis.timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_response_text: DEFAULT_RESPONSE_TEXT.to_string(),
            synthesis_timeout: Duration::from_secs(30),
        }
    }
}
