//! Error taxonomy for the call pipeline
//!
//! Every per-frame failure is one of these kinds. The session loop logs it and
//! moves on to the next frame; only transport closure ends a call and only
//! `ConfigError` stops the process.

use std::time::Duration;
use thiserror::Error;

/// An inbound frame could not be turned into something the session can act on.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("missing required media field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("media payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("no stream_sid on the frame and none recorded for this call")]
    MissingStreamId,

    #[error("`{0}` cannot be advanced without overflow")]
    CounterOverflow(&'static str),
}

/// The speech provider did not hand back usable audio.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("request to synthesis provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("synthesis provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("synthesis provider returned no audio")]
    EmptyAudio,

    #[error("synthesis did not complete within {0:?}")]
    Timeout(Duration),
}

/// Synthesized audio could not be converted to telephony PCM.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("unsupported or unrecognised audio: {0}")]
    Unsupported(String),

    #[error("no decodable audio track")]
    NoAudioTrack,

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("decoded audio is empty")]
    Empty,

    #[error("transcode worker failed: {0}")]
    Worker(String),
}

/// The telephony connection itself failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,

    #[error("transport error: {0}")]
    Io(String),
}

/// Startup configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required credential `{0}`")]
    MissingCredential(&'static str),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failure of one stage of the media pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] FrameError),

    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("transcode failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("failed to send response: {0}")]
    Transport(#[from] TransportError),
}
