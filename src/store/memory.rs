//! In-process document store.
//!
//! Documents are kept per collection in insertion order behind a `tokio`
//! mutex. Contents are lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Filter, StoreError};

#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, data: JsonValue) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().await;
        collections.entry(collection).or_default().push(Document {
            id: id.clone(),
            data,
        });
        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().await;
        let Some(documents) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let take = if limit == 0 { documents.len() } else { limit };
        if filter.is_empty() {
            return Ok(documents.iter().take(take).cloned().collect());
        }

        Ok(documents
            .iter()
            .filter(|d| filter.matches(&d.data))
            .take(take)
            .cloned()
            .collect())
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.lock().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, documents)| !documents.is_empty())
            .map(|(collection, _)| collection.name().to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}
