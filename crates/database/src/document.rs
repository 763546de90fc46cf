//! Document model and the store abstraction the story and stats stores run on

use crate::field_path;
use async_trait::async_trait;
use audiostories_core::{AppError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A stored document with its write version
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    /// Increases by one on every write; starts at 1
    pub version: u64,
    pub data: Value,
}

impl Document {
    /// Returns the value at a dotted field path
    pub fn field(&self, path: &str) -> Option<&Value> {
        field_path::get(&self.data, path)
    }

    /// Maps the document body onto a domain type
    pub fn decode<T: DeserializeOwned>(&self, entity: &str) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| AppError::DeserializationError {
            entity: entity.to_string(),
            reason: format!("{} ({})", e, self.id),
        })
    }
}

/// Collection-of-documents storage keyed by string id.
///
/// Implementations must make `compare_and_set` atomic with respect to every
/// other write on the same document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetches every document of a collection, ordered by id
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Creates or replaces a document, returning its new version
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<u64>;

    /// Writes a single field of an existing document.
    ///
    /// Fails with `RecordNotFound` if the document does not exist.
    async fn update_field(&self, collection: &str, id: &str, path: &str, value: Value)
        -> Result<()>;

    /// Replaces the document only if it is still at `expected_version`.
    ///
    /// Returns `false` when another writer got there first or the document
    /// no longer exists.
    async fn compare_and_set(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        data: Value,
    ) -> Result<bool>;
}

pub(crate) fn not_found(collection: &str, id: &str) -> AppError {
    AppError::RecordNotFound {
        entity: collection.to_string(),
        identifier: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_field_lookup() {
        let doc = Document {
            id: "u1".to_string(),
            version: 1,
            data: json!({"stats": {"lastListenedStoryId": "s1"}}),
        };
        assert_eq!(doc.field("stats.lastListenedStoryId"), Some(&json!("s1")));
    }

    #[test]
    fn test_decode_reports_entity() {
        let doc = Document {
            id: "x".to_string(),
            version: 1,
            data: json!({"name": 3}),
        };
        let err = doc.decode::<Named>("Named").unwrap_err();
        assert!(matches!(err, AppError::DeserializationError { ref entity, .. } if entity == "Named"));

        let ok = Document {
            data: json!({"name": "n"}),
            ..doc
        };
        assert_eq!(ok.decode::<Named>("Named").unwrap().name, "n");
    }
}
