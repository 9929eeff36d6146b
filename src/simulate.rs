//! Scripted telephony peer
//!
//! Plays the provider's side of a call against a running bridge:
//! `connected` → `start` → N × `media` (waiting for each reply) → `stop`.

use anyhow::{Context, Result};
use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};

/// Parameters of a simulated call
#[derive(Debug, Clone)]
pub struct SimulatedCall {
    pub from: String,
    pub to: String,
    pub stream_sid: String,
    /// Sent as `parameters.response_text`; omitted when `None`
    pub response_text: Option<String>,
    /// Caller audio sent as each media payload
    pub payload: Vec<u8>,
    pub media_frames: u32,
    /// How long to wait for each reply before moving on
    pub response_timeout: Duration,
}

impl Default for SimulatedCall {
    fn default() -> Self {
        Self {
            from: "+1234567890".to_string(),
            to: "+0987654321".to_string(),
            stream_sid: "test_stream".to_string(),
            response_text: None,
            payload: Vec::new(),
            media_frames: 1,
            response_timeout: Duration::from_secs(30),
        }
    }
}

impl SimulatedCall {
    /// The `media` event for the `index`-th frame (0-based)
    pub fn media_event(&self, index: u32) -> serde_json::Value {
        let mut event = json!({
            "event": "media",
            "stream_sid": self.stream_sid,
            "sequence_number": index as u64 + 1,
            "media": {
                "chunk": index as u64 + 1,
                "timestamp": (index as u64 * 20).to_string(),
                "payload": base64::engine::general_purpose::STANDARD.encode(&self.payload),
            }
        });

        if let Some(text) = &self.response_text {
            event["parameters"] = json!({ "response_text": text });
        }

        event
    }
}

/// Run `call` against the bridge at `url`, returning every reply received.
pub async fn simulate_call(url: &str, call: &SimulatedCall) -> Result<Vec<String>> {
    info!("Connecting to {}", url);
    let (mut ws, _) = connect_async(url)
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;

    ws.send(Message::Text(json!({ "event": "connected" }).to_string()))
        .await
        .context("Failed to send connected event")?;

    ws.send(Message::Text(
        json!({ "event": "start", "start": { "from": call.from, "to": call.to } }).to_string(),
    ))
    .await
    .context("Failed to send start event")?;

    let mut replies = Vec::new();

    for index in 0..call.media_frames {
        ws.send(Message::Text(call.media_event(index).to_string()))
            .await
            .context("Failed to send media event")?;

        match tokio::time::timeout(call.response_timeout, next_text(&mut ws)).await {
            Ok(Some(reply)) => {
                info!("Received reply to chunk {} ({} bytes)", index + 1, reply.len());
                replies.push(reply);
            }
            Ok(None) => {
                warn!("Bridge closed the connection");
                return Ok(replies);
            }
            Err(_) => warn!("No reply to chunk {} within {:?}", index + 1, call.response_timeout),
        }
    }

    ws.send(Message::Text(json!({ "event": "stop" }).to_string()))
        .await
        .context("Failed to send stop event")?;

    if let Err(e) = ws.close(None).await {
        warn!("Failed to close connection cleanly: {}", e);
    }

    Ok(replies)
}

async fn next_text<S>(ws: &mut S) -> Option<String>
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = ws.next().await {
        match message {
            Ok(Message::Text(text)) => return Some(text),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}
