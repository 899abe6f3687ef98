//! HTTP and WebSocket API.

use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use groundtrack_core::{AirportLayout, Classification};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/layout", get(get_layout))
        .route("/v1/position", get(get_position))
        .route("/v1/stream", get(ws_handler))
}

/// The loaded airport layout, for map rendering.
async fn get_layout(State(state): State<Arc<AppState>>) -> Json<AirportLayout> {
    Json((*state.layout).clone())
}

/// Latest classification, null until the first sample arrives.
async fn get_position(State(state): State<Arc<AppState>>) -> Json<Option<Classification>> {
    Json(state.latest())
}

/// Upgrade to a WebSocket pushing one JSON classification per sample.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.tx.subscribe();

    // Seed the client with the current state so it need not wait for the
    // next sample to render something.
    if let Some(latest) = state.latest() {
        if let Ok(payload) = serde_json::to_string(&latest) {
            if socket.send(Message::Text(payload)).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            event = rx.recv() => {
                match event {
                    Ok(payload) => {
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                        // Drop missed updates; a newer one arrives each sample.
                        continue;
                    }
                    Err(_) => break,
                }
            }
        }
    }
}
