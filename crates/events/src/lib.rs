//! In-process domain events for the slot-swap platform.

pub mod bus;

pub use bus::{EventBus, SwapEvent, SwapEventKind};
