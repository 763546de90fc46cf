//! In-process document store

use crate::document::{not_found, Document, DocumentStore};
use crate::field_path;
use async_trait::async_trait;
use audiostories_core::{AppError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct Stored {
    version: u64,
    data: Value,
}

type Collections = HashMap<String, BTreeMap<String, Stored>>;

/// Document store held entirely in memory.
///
/// Used by tests and by the CLI when no database file is wanted.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.collections
            .lock()
            .map_err(|_| AppError::internal("document store lock poisoned"))
    }

    /// Number of documents in a collection
    pub fn document_count(&self, collection: &str) -> Result<usize> {
        Ok(self.lock()?.get(collection).map_or(0, BTreeMap::len))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|stored| Document {
                id: id.to_string(),
                version: stored.version,
                data: stored.data.clone(),
            }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, stored)| Document {
                        id: id.clone(),
                        version: stored.version,
                        data: stored.data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<u64> {
        let mut collections = self.lock()?;
        let docs = collections.entry(collection.to_string()).or_default();
        let version = docs.get(id).map_or(1, |stored| stored.version + 1);
        docs.insert(id.to_string(), Stored { version, data });
        Ok(version)
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        path: &str,
        value: Value,
    ) -> Result<()> {
        let mut collections = self.lock()?;
        let stored = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;

        field_path::set(&mut stored.data, path, value)?;
        stored.version += 1;
        Ok(())
    }

    async fn compare_and_set(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        data: Value,
    ) -> Result<bool> {
        let mut collections = self.lock()?;
        let Some(stored) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(false);
        };

        if stored.version != expected_version {
            return Ok(false);
        }
        stored.version += 1;
        stored.data = data;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryDocumentStore::new();
        assert_eq!(store.set("stories", "s1", json!({"title": "Fox"})).await.unwrap(), 1);
        assert_eq!(store.set("stories", "s1", json!({"title": "Wolf"})).await.unwrap(), 2);

        let doc = store.get("stories", "s1").await.unwrap().unwrap();
        assert_eq!(doc.data["title"], "Wolf");
        assert_eq!(doc.version, 2);
        assert!(store.get("stories", "nope").await.unwrap().is_none());
        assert!(store.get("other", "s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = MemoryDocumentStore::new();
        store.set("stories", "b", json!({})).await.unwrap();
        store.set("stories", "a", json!({})).await.unwrap();

        let ids: Vec<String> = store
            .list("stories")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(store.list("empty").await.unwrap().is_empty());
        assert_eq!(store.document_count("stories").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_field_requires_document() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update_field("users", "u1", "stats.lastListenedStoryId", json!("s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RecordNotFound { .. }));

        store.set("users", "u1", json!({"stats": {}})).await.unwrap();
        store
            .update_field("users", "u1", "stats.lastListenedStoryId", json!("s1"))
            .await
            .unwrap();
        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.field("stats.lastListenedStoryId"), Some(&json!("s1")));
        assert_eq!(doc.version, 2);
    }

    #[tokio::test]
    async fn test_compare_and_set_checks_version() {
        let store = MemoryDocumentStore::new();
        store.set("c", "x", json!({"n": 1})).await.unwrap();

        assert!(!store.compare_and_set("c", "x", 7, json!({"n": 2})).await.unwrap());
        assert!(store.compare_and_set("c", "x", 1, json!({"n": 2})).await.unwrap());
        assert!(!store.compare_and_set("c", "x", 1, json!({"n": 3})).await.unwrap());
        assert!(!store.compare_and_set("c", "y", 1, json!({})).await.unwrap());

        let doc = store.get("c", "x").await.unwrap().unwrap();
        assert_eq!(doc.data["n"], 2);
    }
}
