//! Role names as they appear in identity-provider token claims.

/// Role granted the moderation surface (forced logouts).
pub const ROLE_ADMIN: &str = "admin";
