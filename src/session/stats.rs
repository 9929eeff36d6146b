use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::state::CallState;

/// Running counters for one call
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    /// Every inbound text message, valid or not
    pub frames_received: usize,

    /// Media events that parsed successfully
    pub media_frames: usize,

    /// Outbound media frames written
    pub responses_sent: usize,

    /// Messages whose processing failed (malformed, synthesis, transcode, send)
    pub frames_dropped: usize,
}

/// What a finished call looked like
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub call_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub final_state: CallState,
    pub stream_sid: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(flatten)]
    pub stats: SessionStats,
}
