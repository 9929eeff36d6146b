use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error};

use super::SpeechSynthesizer;
use crate::config::SynthesisConfig;
use crate::error::{ConfigError, SynthesisError};

/// JSON body of a synthesis request
#[derive(Debug, Clone, Serialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
}

/// ElevenLabs REST client (`POST /v1/text-to-speech/{voice_id}`)
pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    base_url: String,
    model_id: Option<String>,
    output_format: String,
    voice_settings: VoiceSettings,
}

impl ElevenLabsClient {
    /// Build a client from configuration.
    ///
    /// Fails if the API key or voice id is missing.
    pub fn new(config: &SynthesisConfig) -> Result<Self, ConfigError> {
        let credentials = config.credentials()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key: credentials.api_key,
            voice_id: credentials.voice_id,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
            voice_settings: VoiceSettings {
                stability: config.stability,
                similarity_boost: config.similarity_boost,
            },
        })
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id)
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let body = TtsRequest {
            text: text.to_string(),
            model_id: self.model_id.clone(),
            voice_settings: self.voice_settings,
        };

        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("output_format", self.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("ElevenLabs request failed: {}", e);
                SynthesisError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            error!("ElevenLabs API returned status {}: {}", status, body);
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        debug!(
            "Synthesized {} chars into {} bytes in {}ms",
            text.chars().count(),
            audio.len(),
            started.elapsed().as_millis()
        );

        Ok(audio.to_vec())
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}
