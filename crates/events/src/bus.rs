//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! The negotiation engine publishes a [`SwapEvent`] after each committed
//! state transition; the notification dispatcher is one subscriber. The bus
//! is fire-and-forget by design: persisted state is already the source of
//! truth, so nothing downstream may depend on an event being observed.
//! Keeping the engine on this seam means a durable outbox or a shared
//! pub/sub backend can replace the in-process channel later without
//! touching negotiation call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotswap_core::types::DbId;
use tokio::sync::broadcast;

/// What happened to a swap negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEventKind {
    Requested,
    Accepted,
    Rejected,
}

impl SwapEventKind {
    /// Dot-separated event name, e.g. `"swap.requested"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SwapEventKind::Requested => "swap.requested",
            SwapEventKind::Accepted => "swap.accepted",
            SwapEventKind::Rejected => "swap.rejected",
        }
    }
}

/// A committed negotiation state change, addressed to the counterpart who
/// did not perform the action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapEvent {
    pub kind: SwapEventKind,

    /// The user who should be told (the receiver for a new request, the
    /// initiator for a response).
    pub recipient_id: DbId,

    /// The populated swap request as JSON, ready to forward to a client.
    pub payload: serde_json::Value,

    /// When the event was published (UTC).
    pub timestamp: DateTime<Utc>,
}

impl SwapEvent {
    pub fn new(kind: SwapEventKind, recipient_id: DbId, payload: serde_json::Value) -> Self {
        Self {
            kind,
            recipient_id,
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`SwapEvent`]. Designed to be
/// shared via `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<SwapEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; that is fine,
    /// delivery is best-effort.
    pub fn publish(&self, event: SwapEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SwapEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(SwapEvent::new(
            SwapEventKind::Requested,
            7,
            serde_json::json!({"id": 42}),
        ));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, SwapEventKind::Requested);
        assert_eq!(received.recipient_id, 7);
        assert_eq!(received.payload["id"], 42);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(SwapEvent::new(
            SwapEventKind::Accepted,
            3,
            serde_json::Value::Null,
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1.kind, SwapEventKind::Accepted);
        assert_eq!(e2.kind, SwapEventKind::Accepted);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(SwapEvent::new(
            SwapEventKind::Rejected,
            1,
            serde_json::Value::Null,
        ));
    }

    #[test]
    fn event_names_are_dot_separated() {
        assert_eq!(SwapEventKind::Requested.as_str(), "swap.requested");
        assert_eq!(SwapEventKind::Accepted.as_str(), "swap.accepted");
        assert_eq!(SwapEventKind::Rejected.as_str(), "swap.rejected");
    }
}
