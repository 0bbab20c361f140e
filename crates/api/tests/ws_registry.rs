//! Unit tests for `WsRegistry`.
//!
//! These tests exercise the WebSocket connection registry directly, without
//! performing any HTTP upgrades. They verify register/unregister semantics,
//! last-registration-wins replacement, targeted delivery, and graceful
//! shutdown behaviour.

use axum::extract::ws::Message;
use slotswap_api::ws::registry::WsSender;
use slotswap_api::ws::WsRegistry;
use tokio::sync::mpsc;
use uuid::Uuid;

fn channel() -> (WsSender, mpsc::UnboundedReceiver<Message>) {
    mpsc::unbounded_channel()
}

// ---------------------------------------------------------------------------
// Test: new registry starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_registry_has_zero_connections() {
    let registry = WsRegistry::new();

    assert_eq!(registry.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: register() increments the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_increments_connection_count() {
    let registry = WsRegistry::new();

    let (tx, _rx) = channel();
    registry.register(1, Uuid::new_v4(), tx).await;

    assert_eq!(registry.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: unregister() removes the connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unregister_removes_connection() {
    let registry = WsRegistry::new();

    let conn = Uuid::new_v4();
    let (tx, _rx) = channel();
    registry.register(1, conn, tx).await;
    assert_eq!(registry.connection_count().await, 1);

    registry.unregister(1, conn).await;
    assert_eq!(registry.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: re-registering the same user replaces the previous connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn re_registering_replaces_previous_connection() {
    let registry = WsRegistry::new();

    let (tx_old, mut rx_old) = channel();
    registry.register(1, Uuid::new_v4(), tx_old).await;

    let (tx_new, mut rx_new) = channel();
    registry.register(1, Uuid::new_v4(), tx_new).await;

    // Still exactly one connection for the user.
    assert_eq!(registry.connection_count().await, 1);

    // Delivery goes to the newest registration only.
    let delivered = registry.notify(1, Message::Text("hello".into())).await;
    assert!(delivered);

    let msg = rx_new.recv().await.expect("new rx should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "hello"));

    // The replaced channel's sender was dropped, so its queue is closed.
    assert!(rx_old.recv().await.is_none());
}

// ---------------------------------------------------------------------------
// Test: a stale unregister must not tear down the replacement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_unregister_is_noop() {
    let registry = WsRegistry::new();

    let old_conn = Uuid::new_v4();
    let (tx_old, _rx_old) = channel();
    registry.register(1, old_conn, tx_old).await;

    let new_conn = Uuid::new_v4();
    let (tx_new, mut rx_new) = channel();
    registry.register(1, new_conn, tx_new).await;

    // The old connection's cleanup runs after it was already replaced.
    registry.unregister(1, old_conn).await;

    // The new registration survives and still delivers.
    assert_eq!(registry.connection_count().await, 1);
    assert!(registry.notify(1, Message::Text("still here".into())).await);
    let msg = rx_new.recv().await.expect("rx should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "still here"));
}

// ---------------------------------------------------------------------------
// Test: notify() to an unknown user reports non-delivery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notify_unknown_user_returns_false() {
    let registry = WsRegistry::new();

    let delivered = registry.notify(99, Message::Text("anyone?".into())).await;
    assert!(!delivered);
}

// ---------------------------------------------------------------------------
// Test: notify() targets only the addressed user
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notify_targets_only_the_addressed_user() {
    let registry = WsRegistry::new();

    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    registry.register(1, Uuid::new_v4(), tx1).await;
    registry.register(2, Uuid::new_v4(), tx2).await;

    assert!(registry.notify(1, Message::Text("for user 1".into())).await);

    let msg = rx1.recv().await.expect("rx1 should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "for user 1"));

    // User 2's queue stays empty.
    assert!(rx2.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: notify() to a closed channel reports non-delivery without panicking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notify_closed_channel_returns_false() {
    let registry = WsRegistry::new();

    let (tx, rx) = channel();
    registry.register(1, Uuid::new_v4(), tx).await;
    drop(rx);

    let delivered = registry.notify(1, Message::Text("too late".into())).await;
    assert!(!delivered);
}

// ---------------------------------------------------------------------------
// Test: ping_all() queues a Ping on every registered connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let registry = WsRegistry::new();

    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    registry.register(1, Uuid::new_v4(), tx1).await;
    registry.register(2, Uuid::new_v4(), tx2).await;

    registry.ping_all().await;

    let msg1 = rx1.recv().await.expect("rx1 should receive ping");
    let msg2 = rx2.recv().await.expect("rx2 should receive ping");
    assert!(matches!(msg1, Message::Ping(_)));
    assert!(matches!(msg2, Message::Ping(_)));
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close and clears all connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let registry = WsRegistry::new();

    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    registry.register(1, Uuid::new_v4(), tx1).await;
    registry.register(2, Uuid::new_v4(), tx2).await;
    assert_eq!(registry.connection_count().await, 2);

    registry.shutdown_all().await;

    // Connection count should be zero after shutdown.
    assert_eq!(registry.connection_count().await, 0);

    // Both receivers should have received a Close message.
    let msg1 = rx1.recv().await.expect("rx1 should receive Close");
    assert!(
        matches!(msg1, Message::Close(None)),
        "Expected Close(None), got: {msg1:?}"
    );

    let msg2 = rx2.recv().await.expect("rx2 should receive Close");
    assert!(
        matches!(msg2, Message::Close(None)),
        "Expected Close(None), got: {msg2:?}"
    );

    // After Close, the channel should be closed (no more messages).
    assert!(
        rx1.recv().await.is_none(),
        "Channel should be closed after shutdown"
    );
}
