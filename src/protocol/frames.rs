use base64::Engine;
use serde_json::{Map, Value};

use super::messages::{
    MediaEnvelope, OutboundEnvelope, OutboundMedia, StartPayload, WireTimestamp,
};
use crate::error::FrameError;

/// Timestamp advance of one outbound frame (one 20 ms audio frame)
pub const FRAME_ADVANCE_MS: u64 = 20;

/// A single message received from the telephony leg
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Connected,
    Start(StartPayload),
    Media(MediaFrame),
    Stop,
    /// Any other `event` value, or none at all
    Unknown { event: Option<String> },
}

/// A validated `media` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFrame {
    /// Inbound caller audio, already base64-decoded
    pub audio: Vec<u8>,
    pub chunk: u64,
    pub timestamp_ms: u64,
    pub stream_sid: Option<String>,
    pub sequence_number: u64,
    pub response_text: Option<String>,
}

impl InboundFrame {
    /// Parse one wire message.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(mut obj) = value else {
            return Err(FrameError::NotAnObject);
        };

        let event = obj.get("event").map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        });

        match event.as_deref() {
            Some("connected") => return Ok(Self::Connected),
            Some("start") => return Ok(Self::Start(parse_start(&mut obj))),
            Some("media") => return Ok(Self::Media(MediaFrame::from_object(obj)?)),
            Some("stop") => return Ok(Self::Stop),
            _ => {}
        }

        Ok(Self::Unknown { event })
    }

    /// Wire name of the event, for logging.
    pub fn event_name(&self) -> &str {
        match self {
            Self::Connected => "connected",
            Self::Start(_) => "start",
            Self::Media(_) => "media",
            Self::Stop => "stop",
            Self::Unknown { event } => event.as_deref().unwrap_or("<none>"),
        }
    }
}

// Call metadata is informational only; an unreadable block still counts as a start.
fn parse_start(obj: &mut Map<String, Value>) -> StartPayload {
    obj.remove("start")
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

impl MediaFrame {
    fn from_object(obj: Map<String, Value>) -> Result<Self, FrameError> {
        let envelope: MediaEnvelope = serde_json::from_value(Value::Object(obj))?;
        let media = envelope.media.unwrap_or_default();

        let payload = media.payload.ok_or(FrameError::MissingField("payload"))?;
        let chunk = media.chunk.ok_or(FrameError::MissingField("chunk"))?;
        let timestamp = media.timestamp.ok_or(FrameError::MissingField("timestamp"))?;

        let timestamp_ms = match timestamp {
            WireTimestamp::Number(n) => n,
            WireTimestamp::Text(s) => {
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| FrameError::InvalidField {
                        field: "timestamp",
                        reason: format!("{:?} is not a non-negative integer: {}", s, e),
                    })?
            }
        };

        let sequence_number = envelope
            .sequence_number
            .ok_or(FrameError::MissingField("sequence_number"))?;

        // A frame whose reply counters cannot advance is unanswerable
        for (field, value, step) in [
            ("sequence_number", sequence_number, 1),
            ("chunk", chunk, 1),
            ("timestamp", timestamp_ms, FRAME_ADVANCE_MS),
        ] {
            value
                .checked_add(step)
                .ok_or(FrameError::CounterOverflow(field))?;
        }

        let audio = base64::engine::general_purpose::STANDARD.decode(payload.as_bytes())?;

        Ok(Self {
            audio,
            chunk,
            timestamp_ms,
            stream_sid: envelope.stream_sid,
            sequence_number,
            response_text: envelope.parameters.and_then(|p| p.response_text),
        })
    }
}

/// Response to one inbound media frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub stream_sid: String,
    pub sequence_number: u64,
    pub chunk: u64,
    pub timestamp_ms: u64,
    /// Base64-encoded PCM
    pub payload: String,
}

impl OutboundFrame {
    /// Build the reply to `inbound`: sequence and chunk advance by one, the
    /// timestamp by one frame.
    pub fn reply_to(inbound: &MediaFrame, stream_sid: String, pcm: &[u8]) -> Result<Self, FrameError> {
        Ok(Self {
            stream_sid,
            sequence_number: inbound
                .sequence_number
                .checked_add(1)
                .ok_or(FrameError::CounterOverflow("sequence_number"))?,
            chunk: inbound
                .chunk
                .checked_add(1)
                .ok_or(FrameError::CounterOverflow("chunk"))?,
            timestamp_ms: inbound
                .timestamp_ms
                .checked_add(FRAME_ADVANCE_MS)
                .ok_or(FrameError::CounterOverflow("timestamp"))?,
            payload: base64::engine::general_purpose::STANDARD.encode(pcm),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&OutboundEnvelope {
            event: "media",
            stream_sid: &self.stream_sid,
            sequence_number: self.sequence_number,
            media: OutboundMedia {
                chunk: self.chunk,
                timestamp: self.timestamp_ms.to_string(),
                payload: &self.payload,
            },
        })
    }
}
