//! Extraction schema model: the JSON shape a structured-extraction job
//! is asked to produce.

use serde::Serialize;
use sqlx::FromRow;

use scrybe_core::types::{EntityId, Timestamp};

/// A row from the `extraction_schemas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExtractionSchema {
    pub id: EntityId,
    pub organization_id: EntityId,
    pub name: String,
    pub definition: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
