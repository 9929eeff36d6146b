use super::socket::WebSocketTransport;
use super::state::AppState;
use crate::session::CallSession;
use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

/// GET /
/// Liveness for plain HTTP; telephony providers may also upgrade here.
pub async fn root(ws: Option<WebSocketUpgrade>, State(state): State<AppState>) -> Response {
    match ws {
        Some(ws) => upgrade(ws, state),
        None => health_check().await.into_response(),
    }
}

/// GET /ws
/// Upgrade to a telephony media stream
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    upgrade(ws, state)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn upgrade(ws: WebSocketUpgrade, state: AppState) -> Response {
    info!("WebSocket upgrade requested");
    ws.on_upgrade(move |socket| handle_call(socket, state))
}

async fn handle_call(socket: WebSocket, state: AppState) {
    let session = CallSession::new(
        WebSocketTransport::new(socket),
        state.synthesizer,
        state.transcoder,
        state.session_config,
    );

    session.run().await;
}
