//! Request handlers.
//!
//! Each submodule holds the async handler functions for one resource.
//! Handlers delegate persistence to the repositories in `gazette_db` and
//! session arithmetic to `gazette_core`, surfacing failures as
//! [`AppError`](crate::error::AppError).

pub mod activity;
pub mod admin;
pub mod auth;
pub mod sessions;
