//! Search-engine client trait definition.
//!
//! This module defines the abstract interface for the transport client the
//! repository delegates to. Implementations perform all networking, retries,
//! and wire serialization; the repository only builds request values and
//! interprets the facts reported back.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RepositoryError;
use crate::requests::{
    BulkDeleteRequest, CreateIndexRequest, DeleteIndexRequest, IndexDocumentRequest,
    IndexExistsRequest, MultiGetRequest, SearchTemplateRequest,
};

/// Outcome of a single document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutcome {
    /// Number of shards that reported a write failure.
    pub failed_shards: u64,
}

/// One per-index item of a multi-get response, in transport order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiGetItem {
    /// Index the lookup ran against.
    pub index: String,
    /// Whether the id was found on that index.
    pub found: bool,
    /// The document payload, present when found.
    pub source: Option<Value>,
}

/// Abstract interface to the search-engine transport.
///
/// One method per repository intent, each consuming the request value built
/// by the request builders and returning the minimal response facts the
/// facade needs. Implementations must be `Send + Sync` so one client can be
/// shared across tasks; the repository assumes, but does not enforce, that
/// the underlying transport is safe to share.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Create an index with the given mapping.
    ///
    /// Returns whether the cluster acknowledged the creation.
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<bool, RepositoryError>;

    /// Check whether an index exists.
    async fn index_exists(&self, request: &IndexExistsRequest) -> Result<bool, RepositoryError>;

    /// Upsert a document under its id.
    ///
    /// Returns the per-shard write outcome.
    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<IndexOutcome, RepositoryError>;

    /// Look up one id across several indices.
    ///
    /// Returns one item per listed index, in the order the engine reported
    /// them, including items whose id was not found.
    async fn multi_get(
        &self,
        request: &MultiGetRequest,
    ) -> Result<Vec<MultiGetItem>, RepositoryError>;

    /// Run a template search against an index.
    ///
    /// Returns every hit's payload in the relevance order given by the
    /// engine.
    async fn search_template(
        &self,
        request: &SearchTemplateRequest,
    ) -> Result<Vec<Value>, RepositoryError>;

    /// Delete an index.
    ///
    /// Returns whether the cluster acknowledged the deletion.
    async fn delete_index(&self, request: &DeleteIndexRequest) -> Result<bool, RepositoryError>;

    /// Delete several documents from one index in a single bulk call.
    ///
    /// Returns the number of items the engine reported as processed, which
    /// is not necessarily the number of ids that existed.
    async fn bulk_delete(&self, request: &BulkDeleteRequest) -> Result<u64, RepositoryError>;
}
