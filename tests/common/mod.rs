// Shared test doubles: an in-memory call transport, scripted synthesizer and
// transcoder, and in-memory WAV fixtures.
#![allow(dead_code)]

use exotel_bridge::audio::Transcoder;
use exotel_bridge::error::{SynthesisError, TranscodeError, TransportError};
use exotel_bridge::session::{CallTransport, InboundMessage};
use exotel_bridge::tts::SpeechSynthesizer;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Transport
// ============================================================================

/// Replays queued inbound messages, then reports the peer as closed.
pub struct MockTransport {
    incoming: VecDeque<Result<InboundMessage, TransportError>>,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub close_calls: Arc<AtomicUsize>,
    pub fail_sends: bool,
}

impl MockTransport {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            incoming: messages
                .into_iter()
                .map(|m| Ok(InboundMessage::Text(m.into())))
                .collect(),
            sent: Arc::new(Mutex::new(Vec::new())),
            close_calls: Arc::new(AtomicUsize::new(0)),
            fail_sends: false,
        }
    }

    pub fn with_binary(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.incoming.push_back(Ok(InboundMessage::Binary(data.into())));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.incoming.push_back(Ok(InboundMessage::Text(text.into())));
        self
    }

    pub fn with_error(mut self, error: TransportError) -> Self {
        self.incoming.push_back(Err(error));
        self
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent)
    }

    pub fn close_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.close_calls)
    }
}

#[async_trait::async_trait]
impl CallTransport for MockTransport {
    async fn recv(&mut self) -> Option<Result<InboundMessage, TransportError>> {
        self.incoming.pop_front()
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Closed);
        }
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Synthesizer
// ============================================================================

#[derive(Debug, Clone)]
pub enum SynthBehavior {
    Audio(Vec<u8>),
    Fail,
    Empty,
    Slow(Duration),
}

pub struct MockSynthesizer {
    behavior: SynthBehavior,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockSynthesizer {
    pub fn new(behavior: SynthBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(audio: &[u8]) -> Self {
        Self::new(SynthBehavior::Audio(audio.to_vec()))
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        self.requests.lock().unwrap().push(text.to_string());

        match &self.behavior {
            SynthBehavior::Audio(audio) => Ok(audio.clone()),
            SynthBehavior::Fail => Err(SynthesisError::Status {
                status: 500,
                body: "provider down".to_string(),
            }),
            SynthBehavior::Empty => Ok(Vec::new()),
            SynthBehavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(b"late audio".to_vec())
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Transcoder
// ============================================================================

/// Returns fixed PCM for any input, or always fails.
pub struct MockTranscoder {
    output: Option<Vec<u8>>,
    pub inputs: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTranscoder {
    pub fn returning(pcm: &[u8]) -> Self {
        Self {
            output: Some(pcm.to_vec()),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            output: None,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Transcoder for MockTranscoder {
    fn transcode(&self, audio: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        self.inputs.lock().unwrap().push(audio.to_vec());
        self.output
            .clone()
            .ok_or_else(|| TranscodeError::Decode("mock decode failure".to_string()))
    }
}

// ============================================================================
// Audio fixtures
// ============================================================================

/// Interleaved sine wave samples (same tone on every channel)
pub fn sine_samples(duration_ms: u32, sample_rate: u32, channels: u16) -> Vec<i16> {
    let frames = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);

    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let value = (0.5 * (2.0 * std::f64::consts::PI * 440.0 * t).sin() * i16::MAX as f64) as i16;
        for _ in 0..channels {
            samples.push(value);
        }
    }

    samples
}

/// Encode interleaved samples as an in-memory 16-bit WAV file
pub fn wav_bytes(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    cursor.into_inner()
}

pub fn sine_wav(duration_ms: u32, sample_rate: u32, channels: u16) -> Vec<u8> {
    wav_bytes(&sine_samples(duration_ms, sample_rate, channels), sample_rate, channels)
}

/// The reference media frame: sid "sid", sequence 1, chunk 1, timestamp "1000"
pub fn media_frame(response_text: &str) -> String {
    serde_json::json!({
        "event": "media",
        "stream_sid": "sid",
        "sequence_number": 1,
        "media": { "chunk": 1, "timestamp": "1000", "payload": "" },
        "parameters": { "response_text": response_text }
    })
    .to_string()
}
