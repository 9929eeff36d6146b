use serde::{Deserialize, Serialize};

/// Caller details carried by the `start` event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPayload {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Fields of an inbound `media` event (everything except `event` itself)
#[derive(Debug, Default, Deserialize)]
pub struct MediaEnvelope {
    #[serde(default)]
    pub stream_sid: Option<String>,
    #[serde(default)]
    pub sequence_number: Option<u64>,
    #[serde(default)]
    pub media: Option<InboundMedia>,
    #[serde(default)]
    pub parameters: Option<CallParameters>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InboundMedia {
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub chunk: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<WireTimestamp>,
}

/// Media timestamps are integers encoded as strings, but plain numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Number(u64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct CallParameters {
    #[serde(default)]
    pub response_text: Option<String>,
}

/// Outbound `media` message written back to the telephony leg
#[derive(Debug, Serialize)]
pub struct OutboundEnvelope<'a> {
    pub event: &'static str,
    pub stream_sid: &'a str,
    pub sequence_number: u64,
    pub media: OutboundMedia<'a>,
}

#[derive(Debug, Serialize)]
pub struct OutboundMedia<'a> {
    pub chunk: u64,
    pub timestamp: String, // Integer milliseconds as a string
    pub payload: &'a str,  // Base64-encoded 8kHz mono s16le PCM
}
