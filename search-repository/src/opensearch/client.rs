//! OpenSearch client implementation.
//!
//! Submits the request values built by the request builders through the
//! OpenSearch Rust client and extracts the response facts the repository
//! facade needs. All networking, pooling, and wire serialization live in the
//! underlying client; nothing here retries or translates its failures.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    http::StatusCode,
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    BulkParts, IndexParts, MgetParts, OpenSearch, SearchTemplateParts,
};
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::RepositoryError;
use crate::interfaces::{IndexOutcome, MultiGetItem, SearchEngineClient};
use crate::requests::{
    BulkDeleteRequest, CreateIndexRequest, DeleteIndexRequest, IndexDocumentRequest,
    IndexExistsRequest, MultiGetRequest, SearchTemplateRequest,
};

/// Search-engine client backed by an OpenSearch cluster.
pub struct OpenSearchEngineClient {
    client: OpenSearch,
}

impl OpenSearchEngineClient {
    /// Wrap an already-assembled OpenSearch client.
    pub fn new(client: OpenSearch) -> Self {
        Self { client }
    }

    /// Build a client from a connection configuration.
    ///
    /// The transport is assembled once here: basic-auth credentials and the
    /// configured request timeout apply uniformly to every call. The node
    /// addresses in the configuration are scheme-stripped, so the scheme is
    /// re-applied when building the transport URL.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, RepositoryError> {
        let node = config
            .nodes
            .first()
            .map(String::as_str)
            .ok_or_else(|| RepositoryError::Connection("no nodes configured".to_string()))?;
        if config.nodes.len() > 1 {
            warn!(
                node = %node,
                ignored = config.nodes.len() - 1,
                "Transport connects to a single node; additional configured nodes are ignored"
            );
        }
        let url = Url::parse(&format!("https://{}", node))
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let transport = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .auth(Credentials::Basic(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        info!(node = %node, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

/// Interpret an exists-probe status. Success means present, 404 means
/// absent; anything else (auth failure, server error) is not an answer
/// and must surface as a fault.
fn exists_from_status(status: StatusCode) -> Option<bool> {
    if status.is_success() {
        Some(true)
    } else if status == StatusCode::NOT_FOUND {
        Some(false)
    } else {
        None
    }
}

/// Read the acknowledgment flag out of a response body.
fn acknowledged(body: &Value) -> bool {
    body["acknowledged"].as_bool().unwrap_or(false)
}

/// Read the shard-failure count out of a write response body.
fn shard_failures(body: &Value) -> u64 {
    body["_shards"]["failed"].as_u64().unwrap_or(0)
}

/// Turn a multi-get response body into per-index items, in response order.
fn multi_get_items(body: &Value) -> Vec<MultiGetItem> {
    body["docs"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .map(|doc| MultiGetItem {
                    index: doc["_index"].as_str().unwrap_or_default().to_string(),
                    found: doc["found"].as_bool().unwrap_or(false),
                    source: doc.get("_source").cloned(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Collect every hit's payload from a search response body, in hit order.
fn hit_sources(body: &Value) -> Vec<Value> {
    body["hits"]["hits"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Count the items a bulk response reports as processed.
fn bulk_items_processed(body: &Value) -> u64 {
    body["items"]
        .as_array()
        .map(|items| items.len() as u64)
        .unwrap_or(0)
}

#[async_trait]
impl SearchEngineClient for OpenSearchEngineClient {
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<bool, RepositoryError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&request.index))
            .body(&request.body)
            .send()
            .await?
            .error_for_status_code()?;

        let body = response.json::<Value>().await?;
        Ok(acknowledged(&body))
    }

    async fn index_exists(&self, request: &IndexExistsRequest) -> Result<bool, RepositoryError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[request.index.as_str()]))
            .send()
            .await?;

        match exists_from_status(response.status_code()) {
            Some(present) => Ok(present),
            None => {
                let response = response.error_for_status_code()?;
                Ok(response.status_code().is_success())
            }
        }
    }

    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<IndexOutcome, RepositoryError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&request.index, &request.id))
            .body(&request.document)
            .send()
            .await?
            .error_for_status_code()?;

        let body = response.json::<Value>().await?;
        Ok(IndexOutcome {
            failed_shards: shard_failures(&body),
        })
    }

    async fn multi_get(
        &self,
        request: &MultiGetRequest,
    ) -> Result<Vec<MultiGetItem>, RepositoryError> {
        let response = self
            .client
            .mget(MgetParts::None)
            .body(request.body())
            .send()
            .await?
            .error_for_status_code()?;

        let body = response.json::<Value>().await?;
        Ok(multi_get_items(&body))
    }

    async fn search_template(
        &self,
        request: &SearchTemplateRequest,
    ) -> Result<Vec<Value>, RepositoryError> {
        let response = self
            .client
            .search_template(SearchTemplateParts::Index(&[request.index.as_str()]))
            .body(request.body())
            .send()
            .await?
            .error_for_status_code()?;

        let body = response.json::<Value>().await?;
        Ok(hit_sources(&body))
    }

    async fn delete_index(&self, request: &DeleteIndexRequest) -> Result<bool, RepositoryError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[request.index.as_str()]))
            .send()
            .await?;

        // A missing index answers 404 with an error body; report the absent
        // acknowledgment instead of raising.
        if response.status_code().as_u16() == 404 {
            return Ok(false);
        }

        let body = response.error_for_status_code()?.json::<Value>().await?;
        Ok(acknowledged(&body))
    }

    async fn bulk_delete(&self, request: &BulkDeleteRequest) -> Result<u64, RepositoryError> {
        let operations: Vec<JsonBody<Value>> = request
            .operations()
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(&request.index))
            .body(operations)
            .send()
            .await?
            .error_for_status_code()?;

        let body = response.json::<Value>().await?;
        Ok(bulk_items_processed(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exists_probe_treats_only_404_as_absence() {
        assert_eq!(exists_from_status(StatusCode::OK), Some(true));
        assert_eq!(exists_from_status(StatusCode::NOT_FOUND), Some(false));
        // Faults are not an answer; the caller must see them, not "absent".
        assert_eq!(exists_from_status(StatusCode::UNAUTHORIZED), None);
        assert_eq!(exists_from_status(StatusCode::INTERNAL_SERVER_ERROR), None);
        assert_eq!(exists_from_status(StatusCode::BAD_GATEWAY), None);
    }

    #[test]
    fn acknowledged_reads_the_flag() {
        assert!(acknowledged(&json!({ "acknowledged": true, "index": "books" })));
        assert!(!acknowledged(&json!({ "acknowledged": false })));
        assert!(!acknowledged(&json!({ "error": "missing" })));
    }

    #[test]
    fn shard_failures_defaults_to_zero() {
        assert_eq!(
            shard_failures(&json!({ "_shards": { "total": 2, "failed": 1 } })),
            1
        );
        assert_eq!(shard_failures(&json!({ "result": "created" })), 0);
    }

    #[test]
    fn multi_get_items_keeps_response_order_and_found_flags() {
        let body = json!({
            "docs": [
                { "_index": "books", "_id": "1", "found": true, "_source": { "title": "Dune" } },
                { "_index": "archive", "_id": "1", "found": false }
            ]
        });

        let items = multi_get_items(&body);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].index, "books");
        assert!(items[0].found);
        assert_eq!(items[0].source.as_ref().unwrap()["title"], "Dune");
        assert!(!items[1].found);
        assert!(items[1].source.is_none());
    }

    #[test]
    fn hit_sources_collects_payloads_in_hit_order() {
        let body = json!({
            "hits": {
                "hits": [
                    { "_id": "2", "_source": { "title": "Dune" } },
                    { "_id": "1", "_source": { "title": "Steppenwolf" } }
                ]
            }
        });

        let sources = hit_sources(&body);

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0]["title"], "Dune");
        assert_eq!(sources[1]["title"], "Steppenwolf");
    }

    #[test]
    fn bulk_items_processed_counts_items() {
        let body = json!({
            "items": [
                { "delete": { "_id": "1", "result": "deleted" } },
                { "delete": { "_id": "2", "result": "not_found" } }
            ]
        });

        assert_eq!(bulk_items_processed(&body), 2);
        assert_eq!(bulk_items_processed(&json!({ "errors": false })), 0);
    }
}
