//! WebSocket infrastructure: per-user connection registry, the upgrade
//! handler with its IDENTIFY handshake, and the keepalive heartbeat.

pub mod handler;
pub mod heartbeat;
pub mod registry;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use registry::WsRegistry;
