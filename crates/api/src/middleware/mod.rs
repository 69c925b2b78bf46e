//! Authentication and request-context middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the verified, non-revoked user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role claim.
//! - [`client_ip::ClientIp`] -- Caller IP derived from forwarding headers.

pub mod auth;
pub mod client_ip;
pub mod rbac;
