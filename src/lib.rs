pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod session;
pub mod simulate;
pub mod tts;

pub use audio::{SymphoniaTranscoder, Transcoder};
pub use config::Config;
pub use error::{
    ConfigError, FrameError, PipelineError, SynthesisError, TranscodeError, TransportError,
};
pub use http::{create_router, serve, AppState};
pub use protocol::{InboundFrame, MediaFrame, OutboundFrame};
pub use session::{
    CallSession, CallState, CallTransport, InboundMessage, SessionConfig, SessionSummary,
};
pub use simulate::{simulate_call, SimulatedCall};
pub use tts::{ElevenLabsClient, SpeechSynthesizer};
