//! Speech synthesis providers
//!
//! A synthesizer turns response text into an encoded audio blob (MP3 by
//! default). Failures are returned, never raised past this boundary; the
//! session treats any error as "no audio for this frame".

mod elevenlabs;

pub use elevenlabs::{ElevenLabsClient, TtsRequest, VoiceSettings};

use crate::error::SynthesisError;

/// Text-to-speech provider
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text`, returning the provider's encoded audio bytes.
    ///
    /// One remote call per invocation; no caching, no retry.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
