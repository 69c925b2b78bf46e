//! Authentication primitives.
//!
//! - [`jwt`] -- Verification of identity-provider bearer tokens.
//! - [`revocation`] -- The global-logout check applied after verification.

pub mod jwt;
pub mod revocation;
