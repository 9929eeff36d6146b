use crate::error::TransportError;

/// One data message read from the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Text(String),
    /// Some providers send their JSON in binary frames; the bytes are passed
    /// on untouched so the session can reject invalid UTF-8.
    Binary(Vec<u8>),
}

/// One telephony connection, as seen by a [`CallSession`](super::CallSession)
#[async_trait::async_trait]
pub trait CallTransport: Send {
    /// Wait for the next inbound data message.
    ///
    /// Returns `None` once the peer has closed the connection. Control frames
    /// (ping/pong) are handled by the implementation and never surface here.
    async fn recv(&mut self) -> Option<Result<InboundMessage, TransportError>>;

    /// Write one text message to the peer.
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the connection. Called exactly once, when the session ends.
    async fn close(&mut self) -> Result<(), TransportError>;
}
