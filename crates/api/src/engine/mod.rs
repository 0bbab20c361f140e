//! The swap negotiation engine.

mod negotiation;

pub use negotiation::NegotiationEngine;
