//! # Search Repository Shared
//!
//! Shared schema-declaration types for the search repository. Document types
//! declare which of their fields participate in the index mapping, and with
//! what primitive kind, through a static field-descriptor table. The
//! repository crate renders these declarations into index-creation requests.

pub mod schema;

pub use schema::{FieldDescriptor, FieldKind, IndexSchema, IndexedDocument};
