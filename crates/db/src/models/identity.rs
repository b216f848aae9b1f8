//! Identity models: organizations, users, and API keys.
//!
//! These exist so identity resolution is executable; account management
//! endpoints are out of scope.

use serde::Serialize;
use sqlx::FromRow;

use scrybe_core::types::{EntityId, Timestamp};

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: EntityId,
    pub organization_id: EntityId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `api_keys` table.
///
/// **Note:** `key_hash` is never serialized to responses. The
/// `key_prefix` field is used for human-readable identification.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiKey {
    pub id: EntityId,
    pub organization_id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub key_prefix: String,
    pub is_active: bool,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
