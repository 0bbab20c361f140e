//! WebSocket upgrade handler and per-connection loop.
//!
//! The protocol is deliberately small: after connecting, a client sends
//! `{"type": "IDENTIFY", "userId": <id>}` to bind the connection to a user;
//! the server confirms with `{"type": "IDENTIFIED", "userId": <id>}`. From
//! then on the server pushes swap notifications to that user over the
//! connection. Unknown or malformed messages are logged and ignored.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use slotswap_core::types::DbId;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::state::AppState;

/// Messages a client may send over the WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    #[serde(rename = "IDENTIFY")]
    Identify {
        #[serde(rename = "userId")]
        user_id: DbId,
    },
}

/// `GET /ws` -- upgrade to a WebSocket connection.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    tracing::debug!(conn = %conn_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // All outbound traffic (notifications, heartbeats, the IDENTIFIED ack)
    // funnels through one queue so only this task writes to the sink.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let is_close = matches!(message, Message::Close(_));
            if sink.send(message).await.is_err() || is_close {
                break;
            }
        }
    });

    let mut identified_as: Option<DbId> = None;

    while let Some(result) = stream.next().await {
        let message = match result {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(conn = %conn_id, error = %e, "WebSocket read error");
                break;
            }
        };

        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Identify { user_id }) => {
                    // Re-identifying as someone else releases the old binding.
                    if let Some(previous) = identified_as {
                        if previous != user_id {
                            state.ws_registry.unregister(previous, conn_id).await;
                        }
                    }

                    state.ws_registry.register(user_id, conn_id, tx.clone()).await;
                    identified_as = Some(user_id);
                    tracing::info!(user_id, conn = %conn_id, "WebSocket identified");

                    let ack = json!({"type": "IDENTIFIED", "userId": user_id});
                    let _ = tx.send(Message::Text(ack.to_string().into()));
                }
                Err(e) => {
                    tracing::debug!(conn = %conn_id, error = %e, "ignoring unrecognized WebSocket message");
                }
            },
            Message::Close(_) => break,
            // Pings are answered by the protocol layer; pongs need no action.
            Message::Ping(_) | Message::Pong(_) | Message::Binary(_) => {}
        }
    }

    if let Some(user_id) = identified_as {
        state.ws_registry.unregister(user_id, conn_id).await;
    }
    send_task.abort();
    tracing::debug!(conn = %conn_id, "WebSocket disconnected");
}
