//! Domain types and pure negotiation logic for the slot-swap platform.
//!
//! This crate holds everything the rest of the workspace agrees on but that
//! does not touch the network or the database: shared ID/timestamp aliases,
//! the error taxonomy, the slot and swap-request status machines, and the
//! swap precondition checks. Keeping the checks here (rather than inline in
//! handlers) lets them be unit-tested without a running Postgres.

pub mod error;
pub mod negotiation;
pub mod slot;
pub mod swap;
pub mod types;
