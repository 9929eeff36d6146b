//! HTTP and WebSocket server for the telephony leg
//!
//! - GET / - Liveness ("OK"), or media stream upgrade if requested
//! - GET /health - Liveness
//! - GET /ws - Media stream upgrade; one `CallSession` per connection

mod handlers;
mod routes;
mod server;
mod socket;
mod state;

pub use routes::create_router;
pub use server::{serve, serve_listener};
pub use socket::WebSocketTransport;
pub use state::AppState;
