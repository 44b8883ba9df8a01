//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, SessionCommand},
    infrastructure::dto::websocket::CommandEnvelope,
    ui::state::AppState,
    usecase::ConnectError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Generated by the server when absent
    pub client_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> ClientId (Domain Model)
    let client_id = match query.client_id {
        Some(raw) => match ClientId::try_from(raw.clone()) {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!("Invalid client_id format: '{}'", raw);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => ClientId::generate(),
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // The initial snapshot is queued on `tx` before any later broadcast
    match state.broadcaster.connect(client_id.clone(), tx).await {
        Ok(_connected_at) => {
            tracing::info!("Client '{}' connected", client_id);
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, rx)))
        }
        Err(ConnectError::DuplicateClientId(_)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                client_id
            );
            Err(StatusCode::CONFLICT)
        }
        Err(e @ ConnectError::SnapshotEncoding(_)) => {
            tracing::error!("Failed to connect '{}': {}", client_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that forwards queued messages from the rx channel to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver fed by the initial sync and every broadcast
/// * `sender` - WebSocket sink to send messages to this client
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Decode one inbound text frame and hand it to the session.
///
/// Anything that cannot be turned into a command is dropped without a reply.
async fn handle_command(state: &AppState, client_id: &ClientId, text: &str) {
    let envelope = match serde_json::from_str::<CommandEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Failed to parse message from '{}' as JSON: {}", client_id, e);
            return;
        }
    };
    let event_name = envelope.event.clone();

    let command = match SessionCommand::try_from(envelope) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!("Ignored '{}' from '{}': {}", event_name, client_id, e);
            return;
        }
    };

    match state.broadcaster.dispatch(command).await {
        Ok(()) => tracing::info!("Applied '{}' from '{}'", event_name, client_id),
        Err(e) => tracing::debug!("Ignored '{}' from '{}': {}", event_name, client_id, e),
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let client_id_clone = client_id.clone();

    // Spawn a task to receive commands from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", client_id_clone, text);
                    handle_command(&state_clone, &client_id_clone, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push session snapshots to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.broadcaster.disconnect(&client_id).await;
    tracing::info!("Client '{}' disconnected and removed from registry", client_id);
}
