use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::config::SessionConfig;
use super::state::CallState;
use super::stats::{SessionStats, SessionSummary};
use super::transport::{CallTransport, InboundMessage};
use crate::audio::Transcoder;
use crate::error::{FrameError, PipelineError, SynthesisError, TranscodeError};
use crate::protocol::{InboundFrame, MediaFrame, OutboundFrame, StartPayload};
use crate::tts::SpeechSynthesizer;

/// One telephony call bound to one connection
///
/// Frames are handled strictly one at a time: the media pipeline for frame N
/// finishes (reply sent or abandoned) before frame N+1 is read.
pub struct CallSession<T: CallTransport> {
    call_id: Uuid,
    transport: T,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transcoder: Arc<dyn Transcoder>,
    config: SessionConfig,

    state: CallState,
    started_at: chrono::DateTime<Utc>,
    call: Option<StartPayload>,

    /// Echoed on every reply; fixed by the first media frame that carries it
    stream_sid: Option<String>,

    /// Last inbound sequence number seen on a media frame
    sequence_number: Option<u64>,

    stats: SessionStats,
}

impl<T: CallTransport> CallSession<T> {
    pub fn new(
        transport: T,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        transcoder: Arc<dyn Transcoder>,
        config: SessionConfig,
    ) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            transport,
            synthesizer,
            transcoder,
            config,
            state: CallState::AwaitingStart,
            started_at: Utc::now(),
            call: None,
            stream_sid: None,
            sequence_number: None,
            stats: SessionStats::default(),
        }
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn stream_sid(&self) -> Option<&str> {
        self.stream_sid.as_deref()
    }

    pub fn last_sequence_number(&self) -> Option<u64> {
        self.sequence_number
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Drive the call until the peer closes the connection.
    pub async fn run(self) -> SessionSummary {
        let span = info_span!("call", call_id = %self.call_id);
        self.run_to_close().instrument(span).await
    }

    async fn run_to_close(mut self) -> SessionSummary {
        info!("WebSocket connection established");

        while let Some(message) = self.transport.recv().await {
            match message {
                Ok(InboundMessage::Text(text)) => self.handle_message(&text).await,
                Ok(InboundMessage::Binary(data)) => self.handle_binary(data).await,
                Err(e) => {
                    warn!("WebSocket connection closed: {}", e);
                    break;
                }
            }
        }

        self.state = CallState::Terminated;

        if let Err(e) = self.transport.close().await {
            debug!("Close after peer disconnect: {}", e);
        }

        let summary = self.summary();
        info!(
            "WebSocket connection terminated after {:.1}s ({} frames, {} media, {} responses, {} dropped)",
            summary.duration_secs,
            summary.stats.frames_received,
            summary.stats.media_frames,
            summary.stats.responses_sent,
            summary.stats.frames_dropped
        );

        summary
    }

    /// Process one inbound message. Errors are logged and contained here.
    pub async fn handle_message(&mut self, text: &str) {
        self.stats.frames_received += 1;

        let result = self.process_message(text).await;
        self.record_outcome(result);
    }

    /// Process one message that arrived in a binary frame.
    pub async fn handle_binary(&mut self, data: Vec<u8>) {
        self.stats.frames_received += 1;

        let result = match String::from_utf8(data) {
            Ok(text) => self.process_message(&text).await,
            Err(e) => Err(FrameError::from(e).into()),
        };
        self.record_outcome(result);
    }

    fn record_outcome(&mut self, result: Result<(), PipelineError>) {
        if let Err(e) = result {
            self.stats.frames_dropped += 1;
            match e {
                PipelineError::Malformed(e) => error!("Invalid message: {}", e),
                PipelineError::Synthesis(e) => error!("Failed to generate TTS audio: {}", e),
                PipelineError::Transcode(e) => error!("Failed to convert audio to PCM: {}", e),
                PipelineError::Transport(e) => error!("Failed to send response: {}", e),
            }
        }
    }

    async fn process_message(&mut self, text: &str) -> Result<(), PipelineError> {
        if self.state == CallState::Terminated {
            debug!("Call already ended, ignoring message");
            return Ok(());
        }

        let frame = InboundFrame::parse(text)?;
        info!("Event received: {}", frame.event_name());

        match frame {
            InboundFrame::Connected => info!("Call connected"),
            InboundFrame::Start(call) => {
                info!(
                    "Call started from: {} to: {}",
                    call.from.as_deref().unwrap_or("unknown"),
                    call.to.as_deref().unwrap_or("unknown")
                );
                if self.state == CallState::Active {
                    warn!("Duplicate start event, replacing call metadata");
                }
                self.call = Some(call);
                self.state = CallState::Active;
            }
            InboundFrame::Media(media) => self.handle_media(media).await?,
            InboundFrame::Stop => {
                info!("Call ended");
                self.state = CallState::Terminated;
            }
            InboundFrame::Unknown { event } => {
                warn!("Unknown event type: {}", event.as_deref().unwrap_or("<none>"));
            }
        }

        Ok(())
    }

    async fn handle_media(&mut self, media: MediaFrame) -> Result<(), PipelineError> {
        self.stats.media_frames += 1;
        debug!(
            "Received media chunk {} - {} bytes",
            media.chunk,
            media.audio.len()
        );

        let stream_sid = self.resolve_stream_sid(&media)?;
        self.sequence_number = Some(media.sequence_number);

        let text = self.response_text(&media).to_string();
        let audio = synthesize(
            self.synthesizer.as_ref(),
            &text,
            self.config.synthesis_timeout,
        )
        .await?;
        let pcm = transcode(Arc::clone(&self.transcoder), audio).await?;

        let reply = OutboundFrame::reply_to(&media, stream_sid, &pcm)?;
        let json = reply.to_json().map_err(FrameError::from)?;
        self.transport.send(json).await?;
        self.stats.responses_sent += 1;

        debug!(
            "Sent media chunk {} (seq {}, ts {}) - {} bytes PCM",
            reply.chunk,
            reply.sequence_number,
            reply.timestamp_ms,
            pcm.len()
        );

        Ok(())
    }

    fn resolve_stream_sid(&mut self, media: &MediaFrame) -> Result<String, FrameError> {
        if let Some(recorded) = &self.stream_sid {
            if let Some(incoming) = media.stream_sid.as_deref().filter(|s| *s != recorded) {
                warn!("stream_sid changed from {} to {}, keeping {}", recorded, incoming, recorded);
            }
            return Ok(recorded.clone());
        }

        let incoming = media.stream_sid.clone().ok_or(FrameError::MissingStreamId)?;
        self.stream_sid = Some(incoming.clone());
        Ok(incoming)
    }

    fn response_text<'a>(&'a self, media: &'a MediaFrame) -> &'a str {
        media
            .response_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.config.default_response_text)
    }

    fn summary(&self) -> SessionSummary {
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionSummary {
            call_id: self.call_id,
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            final_state: self.state,
            stream_sid: self.stream_sid.clone(),
            from: self.call.as_ref().and_then(|c| c.from.clone()),
            to: self.call.as_ref().and_then(|c| c.to.clone()),
            stats: self.stats.clone(),
        }
    }
}

async fn synthesize(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    timeout: Duration,
) -> Result<Vec<u8>, SynthesisError> {
    let audio = tokio::time::timeout(timeout, synthesizer.synthesize(text))
        .await
        .map_err(|_| SynthesisError::Timeout(timeout))??;

    if audio.is_empty() {
        return Err(SynthesisError::EmptyAudio);
    }

    debug!("{} returned {} bytes of audio", synthesizer.name(), audio.len());

    Ok(audio)
}

// Decoding is CPU bound, keep it off the connection's executor thread.
async fn transcode(transcoder: Arc<dyn Transcoder>, audio: Vec<u8>) -> Result<Vec<u8>, TranscodeError> {
    let pcm = tokio::task::spawn_blocking(move || transcoder.transcode(&audio))
        .await
        .map_err(|e| TranscodeError::Worker(e.to_string()))??;

    if pcm.is_empty() {
        return Err(TranscodeError::Empty);
    }

    Ok(pcm)
}
