//! Telephony WebSocket frame codec
//!
//! Inbound messages are JSON objects tagged by `event`:
//! - `connected` - transport is up
//! - `start` - call metadata (`from`, `to`)
//! - `media` - base64 caller audio with `chunk`, `timestamp`, `stream_sid`, `sequence_number`
//! - `stop` - call ended
//!
//! The only outbound message is `media`, carrying base64 8kHz mono 16-bit PCM.

pub mod frames;
pub mod messages;

pub use frames::{InboundFrame, MediaFrame, OutboundFrame, FRAME_ADVANCE_MS};
pub use messages::StartPayload;
