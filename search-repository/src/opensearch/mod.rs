//! OpenSearch implementation of the search-engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client as the transport.

mod client;

pub use client::OpenSearchEngineClient;
