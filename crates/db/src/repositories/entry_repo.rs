//! Repository for the `entries` table.

use babycontest_core::types::DbId;
use sqlx::PgPool;

use crate::models::entry::{CreateEntry, Entry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, baby_name, baby_age, parent_name, contact, s3_image_url, created_at";

/// Insert and read operations for contest entries. There is no update or
/// delete path.
pub struct EntryRepo;

impl EntryRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEntry) -> Result<Entry, sqlx::Error> {
        let query = format!(
            "INSERT INTO entries (baby_name, baby_age, parent_name, contact, s3_image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, Entry>(&query)
            .bind(&input.baby_name)
            .bind(&input.baby_age)
            .bind(&input.parent_name)
            .bind(&input.contact)
            .bind(&input.s3_image_url)
            .fetch_one(pool)
            .await?;
        tracing::debug!(entry_id = entry.id, "Inserted contest entry");
        Ok(entry)
    }

    /// Find an entry by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Entry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entries WHERE id = $1");
        sqlx::query_as::<_, Entry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Entry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entries ORDER BY id ASC");
        sqlx::query_as::<_, Entry>(&query).fetch_all(pool).await
    }

    /// Total number of stored entries.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM entries")
            .fetch_one(pool)
            .await
    }
}
