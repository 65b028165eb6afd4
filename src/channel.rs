//! Channel adapter: binds the orchestrator to the WebSocket transport
//!
//! Decodes inbound frames (structured JSON or legacy raw text), runs
//! turns strictly sequentially per connection, and pushes each
//! persona's reply to the socket as soon as it is produced. Transport
//! failures stay inside this module; the orchestrator never sees them.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::OrchestratorError;
use crate::models::{InboundFrame, OutboundEvent};
use crate::orchestrator::{EventSink, TurnOrchestrator};
use crate::Result;

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ChannelState {
    pub orchestrator: Arc<TurnOrchestrator>,
}

/// =============================
/// Frame decoding
/// =============================

/// Extract the user message from an inbound frame.
///
/// Accepts the structured shape `{"message": "..."}`, a bare JSON
/// string, or a legacy raw-text frame treated as the entire message
/// body. Any other JSON payload is a decode error.
pub fn decode_frame(raw: &str) -> Result<String> {
    match serde_json::from_str::<InboundFrame>(raw) {
        Ok(frame) => Ok(frame.message),
        Err(_) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::String(s)) => Ok(s),
            Ok(value) => Err(OrchestratorError::FrameDecodeError(format!(
                "inbound frame has no message field: {}",
                value
            ))),
            // Not JSON at all: legacy raw-text frame.
            Err(_) => Ok(raw.to_string()),
        },
    }
}

/// =============================
/// Outbound sink
/// =============================

/// Writes outbound events to the socket. After the first failed write
/// the connection is considered gone and remaining emissions for the
/// in-flight turn become no-ops.
struct WsEventSink {
    sender: SplitSink<WebSocket, Message>,
    connection_id: Uuid,
    closed: bool,
}

#[async_trait::async_trait]
impl EventSink for WsEventSink {
    async fn emit(&mut self, event: OutboundEvent) {
        if self.closed {
            return;
        }

        let frame = match serde_json::to_string(&event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(connection = %self.connection_id, error = %e, "Failed to serialize outbound event");
                return;
            }
        };

        if let Err(e) = self.sender.send(Message::Text(frame)).await {
            let e = OrchestratorError::TransportError(e.to_string());
            debug!(
                connection = %self.connection_id,
                error = %e,
                "Transport write failed, dropping remaining emissions"
            );
            self.closed = true;
        }
    }
}

/// =============================
/// WebSocket endpoint
/// =============================

async fn ws_handler(State(state): State<ChannelState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.orchestrator))
}

async fn handle_socket(socket: WebSocket, orchestrator: Arc<TurnOrchestrator>) {
    let connection_id = Uuid::new_v4();
    info!(connection = %connection_id, "WebSocket connection established");

    let (sender, mut receiver) = socket.split();
    let mut sink = WsEventSink {
        sender,
        connection_id,
        closed: false,
    };

    // Turns run to completion one at a time; a frame arriving mid-turn
    // waits in the socket until the current turn's loop has exited.
    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(raw)) => match decode_frame(&raw) {
                Ok(user_text) => {
                    info!(connection = %connection_id, "Received user message");
                    orchestrator.run_turn(&user_text, &mut sink).await;
                }
                Err(e) => {
                    warn!(connection = %connection_id, error = %e, "Inbound frame rejected");
                    orchestrator.abort_turn(&e.to_string(), &mut sink).await;
                }
            },
            Ok(Message::Close(_)) => {
                info!(connection = %connection_id, "Client disconnected");
                break;
            }
            // Ping/pong are answered by axum; binary frames carry nothing for us.
            Ok(_) => {}
            Err(e) => {
                debug!(connection = %connection_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    info!(connection = %connection_id, "WebSocket connection closed");
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<TurnOrchestrator>) -> Router {
    let state = ChannelState { orchestrator };

    Router::new()
        .route("/health", get(health))
        .route("/api/ws", get(ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<TurnOrchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Family chat server listening on http://0.0.0.0:{}", port);
    info!("WebSocket endpoint: ws://127.0.0.1:{}/api/ws", port);

    axum::serve(listener, router).await?;

    Ok(())
}
