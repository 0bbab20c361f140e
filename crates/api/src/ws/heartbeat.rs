//! Periodic keepalive pings for all registered WebSocket connections.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ws::registry::WsRegistry;

/// Interval between keepalive pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn a background task that pings every registered connection on a
/// fixed interval, keeping idle connections alive through proxies and
/// letting dead ones surface as send failures.
pub fn start_heartbeat(registry: Arc<WsRegistry>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        loop {
            interval.tick().await;
            registry.ping_all().await;
        }
    })
}
