//! Repository for the `api_keys` table.
//!
//! Keys are looked up by SHA-256 hash; the plaintext never touches the
//! database. Key creation endpoints are out of scope, but a create
//! helper exists for bootstrap and tests.

use sqlx::PgPool;

use scrybe_core::ids::{self, PREFIX_API_KEY};

use crate::models::identity::ApiKey;

/// Column list for `api_keys` queries.
const COLUMNS: &str = "\
    id, organization_id, user_id, name, key_hash, key_prefix, is_active, \
    last_used_at, created_at, updated_at";

/// Provides lookups for API-key authentication.
pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Resolve an active key by hash, stamping `last_used_at` in the
    /// same statement. Returns `None` for unknown or revoked keys.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        key_hash: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!(
            "UPDATE api_keys SET last_used_at = NOW() \
             WHERE key_hash = $1 AND is_active \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(key_hash)
            .fetch_optional(pool)
            .await
    }

    /// Insert a key row from a precomputed hash and prefix.
    pub async fn create(
        pool: &PgPool,
        organization_id: &str,
        user_id: &str,
        name: &str,
        key_hash: &str,
        key_prefix: &str,
    ) -> Result<ApiKey, sqlx::Error> {
        let query = format!(
            "INSERT INTO api_keys (id, organization_id, user_id, name, key_hash, key_prefix) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(ids::new_id(PREFIX_API_KEY))
            .bind(organization_id)
            .bind(user_id)
            .bind(name)
            .bind(key_hash)
            .bind(key_prefix)
            .fetch_one(pool)
            .await
    }
}
