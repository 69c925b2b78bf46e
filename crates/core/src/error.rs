#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The credential could not be decoded at all (no usable subject or
    /// issued-at). Distinct from [`CoreError::Revoked`]: a client sending a
    /// garbled or missing token has not been logged out, it was never in.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// A confirmed global-logout record newer than the token's issuance.
    /// This is the only error that may tell a client to discard its session.
    #[error("Token revoked: {0}")]
    Revoked(String),

    /// The external store could not answer. Callers choose their own
    /// fallback; the revocation path fails open, reconstruction fails hard.
    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
