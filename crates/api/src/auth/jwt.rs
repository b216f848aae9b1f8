//! JWT session tokens for browser clients.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret (`JWT_SECRET`).
    pub secret: String,
    /// Token lifetime in seconds (`JWT_EXPIRY_SECS`, default 86400).
    pub expiry_secs: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
        let expiry_secs: i64 = std::env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("JWT_EXPIRY_SECS must be a valid i64");
        Self {
            secret,
            expiry_secs,
        }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Organization id.
    pub org: String,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Issue a session token for a user.
pub fn create_token(
    config: &JwtConfig,
    user_id: &str,
    organization_id: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        org: organization_id.to_string(),
        exp: Utc::now().timestamp() + config.expiry_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate a session token and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
