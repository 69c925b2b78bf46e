//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gazette_core::error::CoreError;
use gazette_core::types::{Timestamp, UserId};

use crate::auth::jwt::{issued_at, verify_token};
use crate::auth::revocation::ensure_not_revoked;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Extraction verifies the token and then probes the revocation markers:
/// a token issued before a global logout is rejected with 401 and
/// `shouldLogout: true`. The probe fails open, so a marker-store outage
/// never logs anyone out.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's identity-provider id (from `claims.sub`).
    pub user_id: UserId,
    /// When the presented token was issued (from `claims.iat`).
    pub issued_at: Timestamp,
    /// Role claim, if the provider granted one.
    pub role: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = verify_token(token, &state.config.jwt)?;
        let issued_at = issued_at(&claims)?;

        ensure_not_revoked(&state.pool, claims.sub, issued_at).await?;

        Ok(AuthUser {
            user_id: claims.sub,
            issued_at,
            role: claims.role,
        })
    }
}
