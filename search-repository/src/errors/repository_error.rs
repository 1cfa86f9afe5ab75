//! Repository error type.
//!
//! The repository introduces no error taxonomy of its own: transport faults
//! from the underlying search-engine client are propagated unmodified, and
//! the only other failure mode is (de)serializing a document payload. Soft
//! operational failures (a non-acknowledged index creation, a partial shard
//! failure) are logged by the facade, not surfaced here.

use thiserror::Error;

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A network or protocol fault from the search-engine client,
    /// propagated as-is. Not retried, not translated.
    #[error(transparent)]
    Transport(#[from] opensearch::Error),

    /// A document payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport could not be assembled from the connection
    /// configuration. Only raised at client construction, never by an
    /// operation.
    #[error("Connection error: {0}")]
    Connection(String),
}
