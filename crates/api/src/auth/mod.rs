//! Request authentication: API keys and JWT sessions resolved to an
//! [`AuthContext`].

pub mod jwt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use scrybe_core::CoreError;
use scrybe_db::repositories::ApiKeyRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The resolved caller identity: who they are, which organization they
/// act for, and — when authenticated by API key — which key.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub organization_id: String,
    /// Present only for API-key authentication; drives usage accounting.
    pub api_key_id: Option<String>,
}

/// SHA-256 hex digest of a plaintext API key.
pub fn hash_api_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

/// Resolve a bearer credential to an [`AuthContext`].
///
/// `sk_`-prefixed tokens are API keys, looked up by hash; anything else
/// is treated as a session JWT. Returns `Ok(None)` for credentials that
/// do not resolve — callers decide how to surface that.
pub async fn resolve_token(
    state: &AppState,
    token: &str,
) -> Result<Option<AuthContext>, sqlx::Error> {
    if token.starts_with("sk_") {
        let key = ApiKeyRepo::find_active_by_hash(&state.pool, &hash_api_key(token)).await?;
        return Ok(key.map(|key| AuthContext {
            user_id: key.user_id,
            organization_id: key.organization_id,
            api_key_id: Some(key.id),
        }));
    }

    match jwt::validate_token(token, &state.config.jwt) {
        Ok(claims) => Ok(Some(AuthContext {
            user_id: claims.sub,
            organization_id: claims.org,
            api_key_id: None,
        })),
        Err(_) => Ok(None),
    }
}

impl FromRequestParts<AppState> for AuthContext {
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

        resolve_token(state, token)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_hash_is_stable_hex() {
        let a = hash_api_key("sk_test_123");
        let b = hash_api_key("sk_test_123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_api_key("sk_test_124"));
    }
}
