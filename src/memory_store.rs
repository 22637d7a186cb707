use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::db::DocumentStore;
use crate::errors::StorageError;
use crate::models::id_to_string;

/// In-process document store.
///
/// Keeps documents per collection in insertion order and matches filters
/// by top-level field equality. Every storage call is counted, which lets
/// callers check that a rejected request never reached storage.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    operations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of insert/query calls served so far.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    fn record_operation(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut record: Document) -> Result<String, StorageError> {
        self.record_operation();
        let id = match record.get("_id") {
            Some(existing) => existing.clone(),
            None => {
                let oid = Bson::ObjectId(ObjectId::new());
                record.insert("_id", oid.clone());
                oid
            }
        };

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StorageError::Driver(format!(
                "duplicate key error: _id {} already exists in {}",
                id, collection
            )));
        }
        documents.push(record);
        tracing::debug!("Inserted document {} into {}", id, collection);
        Ok(id_to_string(&id))
    }

    async fn query(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StorageError> {
        self.record_operation();
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .filter(|d| matches(d, &filter))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StorageError> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn shutdown(&self) {}
}
