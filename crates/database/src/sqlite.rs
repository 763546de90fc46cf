//! Document store persisted in SQLite
//!
//! Each document is one row holding its JSON body and write version. Writes
//! run as single statements, so `compare_and_set` is atomic without an
//! explicit transaction.

use crate::connection::DbPool;
use crate::document::{Document, DocumentStore};
use crate::transaction::{run_transaction, DEFAULT_TRANSACTION_ATTEMPTS};
use crate::{field_path, migrations};
use async_trait::async_trait;
use audiostories_core::{AppError, Result, Timestamp};
use serde_json::Value;

/// `DocumentStore` backed by a sqlx SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: DbPool,
}

impl SqliteDocumentStore {
    /// Wraps a pool whose schema is already migrated
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Migrates the schema and wraps the pool
    pub async fn open(pool: DbPool) -> Result<Self> {
        migrations::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn to_document(id: String, version: i64, body: &str) -> Result<Document> {
    let data = serde_json::from_str(body).map_err(|e| AppError::DeserializationError {
        entity: "document body".to_string(),
        reason: format!("{} ({})", e, id),
    })?;
    Ok(Document {
        id,
        version: version.max(0) as u64,
        data,
    })
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT version, body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database("Failed to fetch document", e))?;

        row.map(|(version, body)| to_document(id.to_string(), version, &body))
            .transpose()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let rows: Vec<(String, i64, String)> = sqlx::query_as(
            "SELECT id, version, body FROM documents WHERE collection = ? ORDER BY id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to list documents", e))?;

        rows.into_iter()
            .map(|(id, version, body)| to_document(id, version, &body))
            .collect()
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<u64> {
        let version: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO documents (collection, id, version, body, updated_at)
            VALUES (?, ?, 1, ?, ?)
            ON CONFLICT (collection, id) DO UPDATE SET
                version = documents.version + 1,
                body = excluded.body,
                updated_at = excluded.updated_at
            RETURNING version
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(data.to_string())
        .bind(Timestamp::now().as_millis())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to write document", e))?;

        Ok(version.max(0) as u64)
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        path: &str,
        value: Value,
    ) -> Result<()> {
        run_transaction(self, collection, id, DEFAULT_TRANSACTION_ATTEMPTS, |body| {
            field_path::set(body, path, value.clone())
        })
        .await
    }

    async fn compare_and_set(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        data: Value,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET version = version + 1, body = ?, updated_at = ?
            WHERE collection = ? AND id = ? AND version = ?
            "#,
        )
        .bind(data.to_string())
        .bind(Timestamp::now().as_millis())
        .bind(collection)
        .bind(id)
        .bind(expected_version as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to commit document", e))?;

        Ok(result.rows_affected() == 1)
    }
}
