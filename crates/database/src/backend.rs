//! Explicitly constructed backend handle shared by the story and stats stores

use crate::auth::{AuthService, MemoryAuthService};
use crate::connection::{connect, DatabaseConfig};
use crate::document::DocumentStore;
use crate::memory::MemoryDocumentStore;
use crate::sqlite::SqliteDocumentStore;
use crate::transaction::DEFAULT_TRANSACTION_ATTEMPTS;
use audiostories_core::Result;
use std::fmt;
use std::sync::Arc;

/// Collection holding the story catalog
pub const STORIES: &str = "stories";

/// Collection holding one profile document per user id
pub const USERS: &str = "users";

/// Document store plus authentication, passed to every store that needs them
#[derive(Clone)]
pub struct Backend {
    documents: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthService>,
    transaction_attempts: usize,
}

impl Backend {
    pub fn new(documents: Arc<dyn DocumentStore>, auth: Arc<dyn AuthService>) -> Self {
        Self {
            documents,
            auth,
            transaction_attempts: DEFAULT_TRANSACTION_ATTEMPTS,
        }
    }

    /// Fresh in-memory documents and accounts
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryAuthService::new()),
        )
    }

    /// Opens (and migrates) a SQLite database for documents
    pub async fn sqlite(config: DatabaseConfig, auth: Arc<dyn AuthService>) -> Result<Self> {
        let pool = connect(config).await?;
        let documents = SqliteDocumentStore::open(pool).await?;
        Ok(Self::new(Arc::new(documents), auth))
    }

    /// Sets how many times a conflicting transaction is re-run
    pub fn with_transaction_attempts(mut self, attempts: usize) -> Self {
        self.transaction_attempts = attempts.max(1);
        self
    }

    pub fn documents(&self) -> &dyn DocumentStore {
        self.documents.as_ref()
    }

    pub fn auth(&self) -> &dyn AuthService {
        self.auth.as_ref()
    }

    pub fn transaction_attempts(&self) -> usize {
        self.transaction_attempts
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("signed_in", &self.auth.current_session().is_some())
            .field("transaction_attempts", &self.transaction_attempts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_backend() {
        let backend = Backend::in_memory().with_transaction_attempts(0);
        assert_eq!(backend.transaction_attempts(), 1);
        assert!(backend.auth().current_session().is_none());

        backend
            .documents()
            .set(STORIES, "s1", json!({"title": "Fox"}))
            .await
            .unwrap();
        assert!(backend.documents().get(STORIES, "s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sqlite_backend() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backend.db").to_str().unwrap().to_string();

        let backend = Backend::sqlite(DatabaseConfig::new(path), Arc::new(MemoryAuthService::new()))
            .await
            .unwrap();

        backend.documents().set(USERS, "u1", json!({})).await.unwrap();
        assert_eq!(backend.documents().list(USERS).await.unwrap().len(), 1);
        assert!(format!("{:?}", backend).contains("transaction_attempts"));
    }
}
