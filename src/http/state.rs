use crate::audio::Transcoder;
use crate::session::SessionConfig;
use crate::tts::SpeechSynthesizer;
use std::sync::Arc;

/// Shared application state for HTTP handlers
///
/// Everything here is immutable; each call gets its own `CallSession` and
/// nothing mutable crosses between them.
#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub transcoder: Arc<dyn Transcoder>,
    pub session_config: SessionConfig,
}

impl AppState {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        transcoder: Arc<dyn Transcoder>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            synthesizer,
            transcoder,
            session_config,
        }
    }
}
