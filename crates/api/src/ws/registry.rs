//! Registry of live WebSocket connections, keyed by user id.
//!
//! Each identified user has at most one live channel. A user who opens a
//! second connection (new tab, reconnect) replaces the previous entry; the
//! stale connection's eventual cleanup is a no-op because unregistration is
//! keyed on the connection id it was registered under.

use std::collections::HashMap;

use axum::extract::ws::Message;
use slotswap_core::types::DbId;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Sender half of a connection's outbound message channel.
pub type WsSender = mpsc::UnboundedSender<Message>;

struct Entry {
    conn_id: Uuid,
    sender: WsSender,
}

/// Tracks the live WebSocket channel of every identified user.
#[derive(Default)]
pub struct WsRegistry {
    channels: RwLock<HashMap<DbId, Entry>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sender` as the live channel for `user_id`.
    ///
    /// Last registration wins: any previously registered channel for the
    /// same user is dropped, which closes its outbound queue.
    pub async fn register(&self, user_id: DbId, conn_id: Uuid, sender: WsSender) {
        let mut channels = self.channels.write().await;
        if let Some(old) = channels.insert(user_id, Entry { conn_id, sender }) {
            tracing::debug!(
                user_id,
                old_conn = %old.conn_id,
                new_conn = %conn_id,
                "replaced existing WebSocket registration"
            );
        } else {
            tracing::debug!(user_id, conn = %conn_id, "registered WebSocket connection");
        }
    }

    /// Remove the registration for `user_id`, but only if it still belongs
    /// to `conn_id`. A connection that was already replaced by a newer one
    /// must not tear down its successor's registration.
    pub async fn unregister(&self, user_id: DbId, conn_id: Uuid) {
        let mut channels = self.channels.write().await;
        if channels
            .get(&user_id)
            .is_some_and(|entry| entry.conn_id == conn_id)
        {
            channels.remove(&user_id);
            tracing::debug!(user_id, conn = %conn_id, "unregistered WebSocket connection");
        }
    }

    /// Send a message to `user_id` if they have a live connection.
    ///
    /// Returns `true` if the message was handed to a channel. Delivery is
    /// best-effort: a `false` here (offline user, closed channel) is not an
    /// error anywhere in the system.
    pub async fn notify(&self, user_id: DbId, message: Message) -> bool {
        let channels = self.channels.read().await;
        match channels.get(&user_id) {
            Some(entry) => entry.sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Queue a Ping frame on every registered connection.
    pub async fn ping_all(&self) {
        let channels = self.channels.read().await;
        for entry in channels.values() {
            let _ = entry.sender.send(Message::Ping(Vec::new().into()));
        }
    }

    /// Queue a Close frame on every connection and clear the registry.
    pub async fn shutdown_all(&self) {
        let mut channels = self.channels.write().await;
        for (user_id, entry) in channels.drain() {
            let _ = entry.sender.send(Message::Close(None));
            tracing::debug!(user_id, "closed WebSocket connection during shutdown");
        }
    }
}
