//! Repository facade.
//!
//! The public operation surface. Every operation builds a request value,
//! submits it through the injected [`SearchEngineClient`], and interprets
//! the response. Transport faults propagate to the caller unmodified; soft
//! failures (a non-acknowledged creation, a partial shard failure, deleting
//! an absent index) are logged at error level and the call still returns its
//! normal result.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error};

use search_repository_shared::IndexedDocument;

use crate::errors::RepositoryError;
use crate::interfaces::SearchEngineClient;
use crate::requests;

/// Generic repository over a search cluster, bound to one document type.
///
/// The repository holds no state beyond the injected client and performs no
/// concurrency of its own; sharing one client between repositories is safe
/// as long as the client itself is.
pub struct SearchRepository<T> {
    client: Box<dyn SearchEngineClient>,
    _document: PhantomData<fn() -> T>,
}

impl<T> SearchRepository<T>
where
    T: IndexedDocument + Serialize + DeserializeOwned,
{
    /// Create a repository delegating to the given client.
    pub fn new(client: Box<dyn SearchEngineClient>) -> Self {
        Self {
            client,
            _document: PhantomData,
        }
    }

    /// Create an index carrying the mapping of `T`.
    ///
    /// A creation the cluster did not acknowledge is logged, not raised.
    pub async fn create_index(&self, index: &str) -> Result<(), RepositoryError> {
        debug!(index = %index, "Creating index");
        let request = requests::create_index::<T>(index);
        if !self.client.create_index(&request).await? {
            error!(index = %index, "Index creation was not acknowledged");
        }
        Ok(())
    }

    /// Check whether an index exists.
    pub async fn index_exists(&self, index: &str) -> Result<bool, RepositoryError> {
        debug!(index = %index, "Checking if index exists");
        let request = requests::index_exists(index);
        self.client.index_exists(&request).await
    }

    /// Upsert a document under the given id.
    ///
    /// A write that failed on some shards is logged, not raised.
    pub async fn index_entity(
        &self,
        index: &str,
        id: &str,
        entity: &T,
    ) -> Result<(), RepositoryError> {
        debug!(index = %index, id = %id, "Indexing entity");
        let request = requests::index_document(index, id, entity)?;
        let outcome = self.client.index_document(&request).await?;
        if outcome.failed_shards > 0 {
            error!(
                index = %index,
                id = %id,
                failed_shards = outcome.failed_shards,
                "Write failed on some shards"
            );
        }
        Ok(())
    }

    /// Find every entity stored under `id` across the given indices.
    ///
    /// Indices with no match are silently omitted; results keep the order
    /// the transport reported them in.
    pub async fn find_by_id(&self, id: &str, indices: &[&str]) -> Result<Vec<T>, RepositoryError> {
        debug!(id = %id, ?indices, "Searching by id");
        let request = requests::multi_get(id, indices);
        let items = self.client.multi_get(&request).await?;

        let mut entities = Vec::new();
        for item in items {
            if !item.found {
                continue;
            }
            if let Some(source) = item.source {
                entities.push(serde_json::from_value(source)?);
            }
        }
        Ok(entities)
    }

    /// Find entities by a template query, with optional parameter bindings.
    ///
    /// Hits come back in the relevance order given by the engine; no further
    /// ordering or pagination is applied.
    pub async fn find_by_template(
        &self,
        index: &str,
        source: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Vec<T>, RepositoryError> {
        debug!(index = %index, "Searching by template");
        let request = requests::search_template(index, source, params);
        let hits = self.client.search_template(&request).await?;
        hits.into_iter()
            .map(|hit| serde_json::from_value(hit).map_err(RepositoryError::from))
            .collect()
    }

    /// Delete an index, returning whether the cluster acknowledged.
    ///
    /// An absent index is logged; the delete is issued regardless and the
    /// cluster's acknowledgment value is returned either way.
    pub async fn delete_index(&self, index: &str) -> Result<bool, RepositoryError> {
        debug!(index = %index, "Deleting index");
        if !self.index_exists(index).await? {
            error!(index = %index, "The index does not exist");
        }
        let request = requests::delete_index(index);
        self.client.delete_index(&request).await
    }

    /// Bulk-delete exactly the given ids from one index.
    ///
    /// Returns the count of items the transport reported as processed,
    /// which is not necessarily the count of ids that existed.
    pub async fn delete(&self, index: &str, ids: &[String]) -> Result<u64, RepositoryError> {
        debug!(index = %index, ?ids, "Deleting documents");
        let request = requests::bulk_delete(index, ids);
        self.client.bulk_delete(&request).await
    }

    /// Release the held client connection.
    ///
    /// Consuming the repository drops the client; a second close is
    /// unrepresentable.
    pub fn close(self) {}
}
