use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    CustomerId, Document, Result, StoreError, Version, WishlistId, store::DocumentStore,
};

/// PostgreSQL-backed document store implementation.
///
/// Documents live in a single `wishlists` table with the body stored as JSONB.
/// Every write is a single conditional statement, so the version check and
/// the write are atomic without explicit row locks.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        Ok(Document {
            id: WishlistId::from_uuid(row.try_get::<Uuid, _>("id")?),
            owner_id: CustomerId::new(row.try_get::<String, _>("owner_id")?),
            version: Version::new(row.try_get("version")?),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
            body: row.try_get("body")?,
        })
    }

    async fn stored_version(&self, id: WishlistId, owner_id: &CustomerId) -> Result<Version> {
        let version: Option<i64> = sqlx::query_scalar(
            "SELECT version FROM wishlists WHERE id = $1 OR owner_id = $2 ORDER BY version DESC LIMIT 1",
        )
        .bind(id.as_uuid())
        .bind(owner_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(version.map(Version::new).unwrap_or_else(Version::initial))
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn load(&self, id: WishlistId) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, owner_id, version, created_at, updated_at, body
            FROM wishlists
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn find_by_owner(&self, owner_id: &CustomerId) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, owner_id, version, created_at, updated_at, body
            FROM wishlists
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn save(&self, document: Document, expected_version: Version) -> Result<Version> {
        let new_version = expected_version.next();

        let rows_affected = if expected_version.is_initial() {
            // Any unique violation (id or owner) means someone else created it first.
            sqlx::query(
                r#"
                INSERT INTO wishlists (id, owner_id, version, created_at, updated_at, body)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(document.id.as_uuid())
            .bind(document.owner_id.as_str())
            .bind(new_version.as_i64())
            .bind(document.created_at)
            .bind(document.updated_at)
            .bind(&document.body)
            .execute(&self.pool)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE wishlists
                SET version = $3, updated_at = $4, body = $5
                WHERE id = $1 AND version = $2
                "#,
            )
            .bind(document.id.as_uuid())
            .bind(expected_version.as_i64())
            .bind(new_version.as_i64())
            .bind(document.updated_at)
            .bind(&document.body)
            .execute(&self.pool)
            .await?
            .rows_affected()
        };

        if rows_affected == 0 {
            let actual = self.stored_version(document.id, &document.owner_id).await?;
            tracing::debug!(
                wishlist_id = %document.id,
                expected = %expected_version,
                actual = %actual,
                "conditional write rejected"
            );
            return Err(StoreError::VersionConflict {
                wishlist_id: document.id,
                expected: expected_version,
                actual,
            });
        }

        Ok(new_version)
    }
}
