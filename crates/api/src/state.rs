use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::NegotiationEngine;
use crate::ws::WsRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: slotswap_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection registry (one live channel per user).
    pub ws_registry: Arc<WsRegistry>,
    /// Event bus carrying committed negotiation state changes.
    pub event_bus: Arc<slotswap_events::EventBus>,
    /// The swap negotiation engine.
    pub engine: NegotiationEngine,
}
