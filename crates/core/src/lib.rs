//! Gazette core domain logic.
//!
//! Pure, I/O-free building blocks shared by the database and API crates:
//! the error taxonomy, common type aliases, session reconstruction from
//! activity history, and sliding-window throttle arithmetic.

pub mod error;
pub mod replay;
pub mod roles;
pub mod throttle;
pub mod types;
