//! Forwards committed swap events to the recipient's WebSocket connection.
//!
//! Runs as a background task subscribed to the event bus. Delivery is
//! best-effort: an offline recipient simply misses the push and will see
//! the change on their next poll of the REST endpoints.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::json;
use slotswap_events::{SwapEvent, SwapEventKind};
use tokio::sync::broadcast;

use crate::ws::registry::WsRegistry;

/// Consumes [`SwapEvent`]s and pushes them to recipients.
pub struct NotificationRouter {
    registry: Arc<WsRegistry>,
}

impl NotificationRouter {
    pub fn new(registry: Arc<WsRegistry>) -> Self {
        Self { registry }
    }

    /// Drain the event stream until the bus is dropped.
    pub async fn run(self, mut events: broadcast::Receiver<SwapEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.dispatch(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Missed pushes are acceptable; REST state is authoritative.
                    tracing::warn!(skipped, "notification router lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("event bus closed, notification router stopping");
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, event: SwapEvent) {
        let message = Self::to_message(&event);
        let delivered = self.registry.notify(event.recipient_id, message).await;

        tracing::debug!(
            kind = event.kind.as_str(),
            recipient_id = event.recipient_id,
            delivered,
            "dispatched swap notification"
        );
    }

    /// Build the client-facing WebSocket frame for an event.
    fn to_message(event: &SwapEvent) -> Message {
        let message_type = match event.kind {
            SwapEventKind::Requested => "NEW_SWAP_REQUEST",
            SwapEventKind::Accepted => "SWAP_ACCEPTED",
            SwapEventKind::Rejected => "SWAP_REJECTED",
        };
        let body = json!({
            "type": message_type,
            "data": event.payload,
        });
        Message::Text(body.to_string().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(message: Message) -> serde_json::Value {
        match message {
            Message::Text(text) => serde_json::from_str(&text).expect("frame should be JSON"),
            other => panic!("expected a Text frame, got {other:?}"),
        }
    }

    #[test]
    fn requested_event_becomes_new_swap_request_frame() {
        let event = SwapEvent::new(
            SwapEventKind::Requested,
            5,
            json!({"id": 9, "status": "PENDING"}),
        );
        let frame = text_of(NotificationRouter::to_message(&event));
        assert_eq!(frame["type"], "NEW_SWAP_REQUEST");
        assert_eq!(frame["data"]["id"], 9);
        assert_eq!(frame["data"]["status"], "PENDING");
    }

    #[test]
    fn response_events_map_to_accepted_and_rejected_frames() {
        let accepted = SwapEvent::new(SwapEventKind::Accepted, 1, json!({}));
        let rejected = SwapEvent::new(SwapEventKind::Rejected, 1, json!({}));
        assert_eq!(
            text_of(NotificationRouter::to_message(&accepted))["type"],
            "SWAP_ACCEPTED"
        );
        assert_eq!(
            text_of(NotificationRouter::to_message(&rejected))["type"],
            "SWAP_REJECTED"
        );
    }
}
