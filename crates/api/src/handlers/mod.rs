//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod groups;
pub mod slots;
pub mod swaps;
