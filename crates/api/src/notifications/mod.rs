//! Best-effort push notifications over WebSocket.

mod router;

pub use router::NotificationRouter;
