//! Entity models mapping database rows to Rust structs.

pub mod group;
pub mod slot;
pub mod swap_request;
pub mod user;
