//! Bearer-token verification.
//!
//! Tokens are HS256-signed JWTs minted by the external identity provider;
//! this service never issues them. Verification checks the signature and
//! expiry, then hands back the [`Claims`] the rest of the request pipeline
//! cares about: who the caller is (`sub`) and when their token was issued
//! (`iat`), which the revocation check compares against global-logout
//! markers.

use gazette_core::error::CoreError;
use gazette_core::types::{Timestamp, UserId};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's identity-provider id.
    pub sub: UserId,
    /// Expiration time (UTC Unix timestamp). Set by the provider.
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp). The revocation pivot: a
    /// global-logout marker at or after this instant kills the token.
    pub iat: i64,
    /// Optional role name (e.g. `"admin"`). Absent for ordinary users.
    #[serde(default)]
    pub role: Option<String>,
}

/// Configuration for token verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required | Default |
    /// |--------------|----------|---------|
    /// | `JWT_SECRET` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Verify and decode an access token, returning the embedded [`Claims`].
///
/// Distinguishes two failure classes: a credential that is not a parseable
/// token at all maps to [`CoreError::MalformedToken`] (the client may be
/// sending garbage or a truncated header, it was never authenticated), while
/// a well-formed token that fails signature or expiry checks maps to
/// [`CoreError::Unauthorized`]. Neither implies revocation; that verdict
/// only ever comes from a global-logout marker.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, CoreError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => {
            CoreError::MalformedToken("Bearer credential is not a well-formed token".into())
        }
        _ => CoreError::Unauthorized("Invalid or expired token".into()),
    })
}

/// The token's issue instant as a timestamp.
pub fn issued_at(claims: &Claims) -> Result<Timestamp, CoreError> {
    chrono::DateTime::from_timestamp(claims.iat, 0)
        .ok_or_else(|| CoreError::MalformedToken("Token iat is out of range".into()))
}
