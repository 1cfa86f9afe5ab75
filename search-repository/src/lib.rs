//! # Search Repository
//!
//! A generic repository facade over a search cluster: create and delete
//! indices, index documents, fetch by id across indices, search by template
//! query, and bulk-delete documents. Every operation is a direct translation
//! into a call on the underlying search-engine client; the facade builds the
//! request values, submits them through a [`SearchEngineClient`], and
//! interprets the responses.
//!
//! Document types declare their index schema through the
//! [`IndexedDocument`](search_repository_shared::IndexedDocument) trait from
//! the shared crate.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod requests;
pub mod repository;

pub use config::ConnectionConfig;
pub use errors::RepositoryError;
pub use interfaces::{IndexOutcome, MultiGetItem, SearchEngineClient};
pub use self::opensearch::OpenSearchEngineClient;
pub use repository::SearchRepository;
