//! Error types for the search repository.

mod repository_error;

pub use repository_error::RepositoryError;
