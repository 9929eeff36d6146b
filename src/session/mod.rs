//! Call session management
//!
//! A `CallSession` owns one telephony WebSocket for the lifetime of a call:
//! - Parses inbound frames and drives the call state machine
//! - Runs the media pipeline (synthesis, transcoding, reply) per media frame
//! - Keeps per-call counters and reports a summary when the call ends

mod config;
mod session;
mod state;
mod stats;
mod transport;

pub use config::SessionConfig;
pub use session::CallSession;
pub use state::CallState;
pub use stats::{SessionStats, SessionSummary};
pub use transport::{CallTransport, InboundMessage};
