//! Repository for the `extraction_schemas` table.

use sqlx::PgPool;

use crate::models::schema::ExtractionSchema;

/// Column list for `extraction_schemas` queries.
const COLUMNS: &str = "id, organization_id, name, definition, created_at, updated_at";

/// Provides lookups for extraction schemas.
pub struct SchemaRepo;

impl SchemaRepo {
    /// Find a schema scoped to an organization.
    pub async fn find_for_org(
        pool: &PgPool,
        id: &str,
        organization_id: &str,
    ) -> Result<Option<ExtractionSchema>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM extraction_schemas WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, ExtractionSchema>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }
}
