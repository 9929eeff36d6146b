use axum::extract::ws::{Message, WebSocket};
use tracing::debug;

use crate::error::TransportError;
use crate::session::{CallTransport, InboundMessage};

/// `CallTransport` over an upgraded axum WebSocket
pub struct WebSocketTransport {
    socket: WebSocket,
    closed: bool,
}

impl WebSocketTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self {
            socket,
            closed: false,
        }
    }
}

#[async_trait::async_trait]
impl CallTransport for WebSocketTransport {
    async fn recv(&mut self) -> Option<Result<InboundMessage, TransportError>> {
        if self.closed {
            return None;
        }

        loop {
            let message = match self.socket.recv().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(TransportError::Io(e.to_string()))),
            };

            match message {
                Message::Text(text) => return Some(Ok(InboundMessage::Text(text))),
                Message::Binary(data) => return Some(Ok(InboundMessage::Binary(data))),
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(frame) => {
                    debug!("Peer sent close frame: {:?}", frame);
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.socket
            .send(Message::Close(None))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}
