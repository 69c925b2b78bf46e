//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod global_logout_repo;

pub use activity_repo::ActivityRepo;
pub use global_logout_repo::GlobalLogoutRepo;
