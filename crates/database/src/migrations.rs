//! Database migrations

use crate::DbPool;
use audiostories_core::AppError;

/// Migration 001: Document table
const MIGRATION_001: &str = include_str!("../migrations/001_documents.sql");

/// Migration 002: Collection listing index
const MIGRATION_002: &str = include_str!("../migrations/002_collection_index.sql");

const MIGRATIONS: &[(i64, &str)] = &[(1, MIGRATION_001), (2, MIGRATION_002)];

/// Current database schema version
pub const CURRENT_VERSION: i64 = 2;

/// Returns the current migration version
pub fn current_version() -> i64 {
    CURRENT_VERSION
}

/// Runs all pending migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to create migrations table", e))?;

    for (version, sql) in MIGRATIONS {
        run_migration(pool, *version, sql).await?;
    }

    Ok(())
}

/// Runs a single migration if not already applied
async fn run_migration(pool: &DbPool, version: i64, sql: &str) -> Result<(), AppError> {
    let applied: Option<i64> =
        sqlx::query_scalar("SELECT version FROM schema_migrations WHERE version = ?")
            .bind(version)
            .fetch_optional(pool)
            .await
            .map_err(|e| AppError::database("Failed to check migration status", e))?;

    if applied.is_some() {
        return Ok(());
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database("Failed to start migration", e))?;

    sqlx::query(sql)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to run migration {}", version), e))?;

    sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
        .bind(version)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to record migration {}", version), e))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to commit migration {}", version), e))?;

    log::info!("Applied database migration {}", version);
    Ok(())
}

/// Verifies database integrity
pub async fn verify_integrity(pool: &DbPool) -> Result<(), AppError> {
    let result: String = sqlx::query_scalar("PRAGMA integrity_check")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to check integrity", e))?;

    if result != "ok" {
        return Err(AppError::DatabaseError {
            message: format!("Database integrity check failed: {}", result),
            source: None,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_in_memory;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let versions: Vec<i64> =
            sqlx::query_scalar("SELECT version FROM schema_migrations ORDER BY version")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert_eq!(versions, vec![1, 2]);
        assert_eq!(*versions.last().unwrap(), current_version());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_verify_integrity() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();

        verify_integrity(&pool).await.unwrap();
    }
}
