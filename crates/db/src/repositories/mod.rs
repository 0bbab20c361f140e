//! Data-access repositories, one per aggregate.

pub mod group_repo;
pub mod slot_repo;
pub mod swap_request_repo;
pub mod user_repo;

pub use group_repo::GroupRepo;
pub use slot_repo::SlotRepo;
pub use swap_request_repo::SwapRequestRepo;
pub use user_repo::UserRepo;
