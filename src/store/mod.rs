//! Document-store access.
//!
//! Records live in named collections inside a schema-flexible store. Each
//! document gets a store-generated identifier on insert; the identifier is
//! kept beside the body and never inside it.

pub mod filter;
pub mod memory;
pub mod spanner;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::schema::Record;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use spanner::{SpannerStore, SpannerTarget};

/// The fixed set of collections this service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Kitten,
    Inquiry,
    Testimonial,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Kitten, Collection::Inquiry, Collection::Testimonial];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Kitten => "kitten",
            Collection::Inquiry => "inquiry",
            Collection::Testimonial => "testimonial",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored document: generated identifier plus the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: JsonValue,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store operation '{operation}' timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Backend-neutral access to the document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document body and return its generated identifier.
    async fn insert(&self, collection: Collection, data: JsonValue) -> Result<String, StoreError>;

    /// Documents matching `filter`, in store order. `limit == 0` means no limit.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Database name, when the backend knows one.
    fn name(&self) -> Option<&str>;

    /// Names of the collections that currently exist.
    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;
}

/// Serialize a validated record and insert it into its collection.
pub async fn create_document<R: Record>(
    store: &dyn DocumentStore,
    record: &R,
) -> Result<String, StoreError> {
    let mut data = serde_json::to_value(record)?;
    if let Some(body) = data.as_object_mut() {
        body.remove("id");
    }

    let id = store.insert(R::COLLECTION, data).await?;
    tracing::debug!("Inserted document {} into {}", id, R::COLLECTION);
    Ok(id)
}

/// Find documents in `collection` matching `filter`, at most `limit` (0 = all).
pub async fn get_documents(
    store: &dyn DocumentStore,
    collection: Collection,
    filter: &Filter,
    limit: usize,
) -> Result<Vec<Document>, StoreError> {
    let documents = store.find(collection, filter, limit).await?;
    tracing::debug!(
        "Found {} documents in {} (conditions: {}, limit: {})",
        documents.len(),
        collection,
        filter.conditions().len(),
        limit
    );
    Ok(documents)
}

/// Decode document bodies as `R`, skipping any that do not fit the record shape.
pub fn decode_documents<R: Record>(documents: Vec<Document>) -> Vec<(String, R)> {
    documents
        .into_iter()
        .filter_map(|document| match serde_json::from_value::<R>(document.data) {
            Ok(record) => Some((document.id, record)),
            Err(e) => {
                tracing::warn!(
                    "Skipping undecodable document {} in {}: {}",
                    document.id,
                    R::COLLECTION,
                    e
                );
                None
            }
        })
        .collect()
}

/// Run a backend call under the configured timeout.
pub(crate) async fn bounded<T, F>(
    after: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result.map_err(StoreError::Backend),
        Err(_) => Err(StoreError::Timeout { operation, after }),
    }
}

/// Backend selected by `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    Memory { name: String },
    Spanner(SpannerTarget),
}

impl StoreUrl {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();

        if let Some(rest) = url.strip_prefix("memory:") {
            let name = rest.trim_start_matches('/').trim_end_matches('/');
            let name = if name.is_empty() { "memory" } else { name };
            return Ok(StoreUrl::Memory {
                name: name.to_string(),
            });
        }

        if let Some(path) = url.strip_prefix("spanner://") {
            return SpannerTarget::parse(path).map(StoreUrl::Spanner);
        }

        if url.starts_with("projects/") {
            return SpannerTarget::parse(url).map(StoreUrl::Spanner);
        }

        let scheme = url.split_once(':').map(|(scheme, _)| scheme).unwrap_or("none");
        bail!("unsupported DATABASE_URL scheme '{}' (expected memory: or spanner://)", scheme)
    }
}

/// Establish the process-wide store handle.
///
/// Never fails: a missing or unusable connection string, a failed connection
/// or a timeout all leave the service running without a store.
pub async fn connect(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; running without a document store");
        return None;
    };

    match open(url, config).await {
        Ok(store) => {
            tracing::info!(
                "Document store ready: {}",
                store.name().unwrap_or("unnamed")
            );
            Some(store)
        }
        Err(e) => {
            tracing::warn!("Document store unavailable, continuing without it: {:#}", e);
            None
        }
    }
}

async fn open(url: &str, config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match StoreUrl::parse(url).context("Invalid DATABASE_URL")? {
        StoreUrl::Memory { name } => {
            tracing::info!("Using in-process document store '{}'", name);
            Ok(Arc::new(MemoryStore::new(name)))
        }
        StoreUrl::Spanner(target) => {
            let store = tokio::time::timeout(
                config.store_connect_timeout,
                SpannerStore::connect(&target, config),
            )
            .await
            .map_err(|_| {
                anyhow!(
                    "Timed out connecting to Spanner after {}s",
                    config.store_connect_timeout.as_secs()
                )
            })??;
            Ok(Arc::new(store))
        }
    }
}
