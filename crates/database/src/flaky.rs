//! Fault-injecting wrapper for exercising retry and conflict paths

use crate::document::{Document, DocumentStore};
use async_trait::async_trait;
use audiostories_core::{AppError, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps a store and fails the next N operations before delegating.
///
/// `with_conflicts` additionally makes the next N `compare_and_set` calls
/// report a lost race without writing.
#[derive(Debug)]
pub struct FlakyDocumentStore<S> {
    inner: S,
    failures_left: AtomicUsize,
    conflicts_left: AtomicUsize,
    reads: AtomicUsize,
}

impl<S: DocumentStore> FlakyDocumentStore<S> {
    pub fn new(inner: S, failures: usize) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(failures),
            conflicts_left: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn with_conflicts(self, conflicts: usize) -> Self {
        self.conflicts_left.store(conflicts, Ordering::SeqCst);
        self
    }

    /// Makes the next `failures` operations fail
    pub fn fail_next(&self, failures: usize) {
        self.failures_left.store(failures, Ordering::SeqCst);
    }

    /// Number of `get` and `list` calls seen, failed ones included
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if Self::take(&self.failures_left) {
            return Err(AppError::network(
                format!("injected failure during {}", operation),
                std::io::Error::from(std::io::ErrorKind::ConnectionReset),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FlakyDocumentStore<S> {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check("get")?;
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check("list")?;
        self.inner.list(collection).await
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<u64> {
        self.check("set")?;
        self.inner.set(collection, id, data).await
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        path: &str,
        value: Value,
    ) -> Result<()> {
        self.check("update_field")?;
        self.inner.update_field(collection, id, path, value).await
    }

    async fn compare_and_set(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        data: Value,
    ) -> Result<bool> {
        self.check("compare_and_set")?;
        if Self::take(&self.conflicts_left) {
            return Ok(false);
        }
        self.inner
            .compare_and_set(collection, id, expected_version, data)
            .await
    }
}
