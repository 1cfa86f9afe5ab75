//! Request builders.
//!
//! One builder per repository intent. Each builder is a pure, synchronous
//! constructor: it produces a transport-ready request value and performs no
//! I/O. Document ids and index names are caller-supplied opaque strings and
//! pass through untouched.

use serde::Serialize;
use serde_json::{json, Map, Value};

use search_repository_shared::{IndexSchema, IndexedDocument};

use crate::errors::RepositoryError;

/// Request to create an index with the mapping of a document type.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexRequest {
    /// Name of the index to create.
    pub index: String,
    /// Mapping body derived from the document type's schema.
    pub body: Value,
}

/// Request to upsert a document under an id.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocumentRequest {
    /// Target index.
    pub index: String,
    /// Document id.
    pub id: String,
    /// Serialized document payload.
    pub document: Value,
}

/// Request to look up one id across several indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiGetRequest {
    /// The id looked up on every listed index.
    pub id: String,
    /// Indices to probe, in the order given.
    pub indices: Vec<String>,
}

impl MultiGetRequest {
    /// Render the multi-get body: one doc entry per index, all sharing
    /// the same id.
    pub fn body(&self) -> Value {
        let docs: Vec<Value> = self
            .indices
            .iter()
            .map(|index| json!({ "_index": index, "_id": self.id }))
            .collect();

        json!({ "docs": docs })
    }
}

/// Request to run a template search against an index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTemplateRequest {
    /// Index the template runs against.
    pub index: String,
    /// Template source text.
    pub source: String,
    /// Parameter bindings, if the template takes any.
    pub params: Option<Map<String, Value>>,
}

impl SearchTemplateRequest {
    /// Render the template-search body. The `params` key is only present
    /// when bindings were given.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("source".to_string(), Value::String(self.source.clone()));
        if let Some(params) = &self.params {
            body.insert("params".to_string(), Value::Object(params.clone()));
        }
        Value::Object(body)
    }
}

/// Request to delete an index.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteIndexRequest {
    /// Name of the index to remove.
    pub index: String,
}

/// Request to check whether an index exists.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExistsRequest {
    /// Name of the index to probe.
    pub index: String,
}

/// Request to delete several documents from one index in a single bulk call.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDeleteRequest {
    /// Index all operations are scoped to.
    pub index: String,
    /// Document ids to delete, in the order given.
    pub ids: Vec<String>,
}

impl BulkDeleteRequest {
    /// Render the bulk operations: one delete action line per id.
    pub fn operations(&self) -> Vec<Value> {
        self.ids
            .iter()
            .map(|id| json!({ "delete": { "_index": self.index, "_id": id } }))
            .collect()
    }
}

/// Build a create-index request carrying the mapping of `T`.
///
/// Each schema field is mapped under its declared kind and additionally
/// nested as a same-named sub-field of identical kind, so exact-match
/// sub-queries can address `field.field`.
pub fn create_index<T: IndexedDocument>(index: &str) -> CreateIndexRequest {
    let schema = IndexSchema::of::<T>();
    let mut properties = Map::new();
    for (name, kind) in schema.fields() {
        properties.insert(
            name.to_string(),
            json!({
                (kind.as_str()): {
                    "fields": {
                        (name): { (kind.as_str()): {} }
                    }
                }
            }),
        );
    }

    CreateIndexRequest {
        index: index.to_string(),
        body: json!({ "mappings": { "properties": properties } }),
    }
}

/// Build an upsert-by-id request for a document.
pub fn index_document<T: Serialize>(
    index: &str,
    id: &str,
    entity: &T,
) -> Result<IndexDocumentRequest, RepositoryError> {
    Ok(IndexDocumentRequest {
        index: index.to_string(),
        id: id.to_string(),
        document: serde_json::to_value(entity)?,
    })
}

/// Build a multi-get request looking up `id` on every listed index.
pub fn multi_get(id: &str, indices: &[&str]) -> MultiGetRequest {
    MultiGetRequest {
        id: id.to_string(),
        indices: indices.iter().map(|index| index.to_string()).collect(),
    }
}

/// Build a template-search request, with parameter bindings when given.
pub fn search_template(
    index: &str,
    source: &str,
    params: Option<Map<String, Value>>,
) -> SearchTemplateRequest {
    SearchTemplateRequest {
        index: index.to_string(),
        source: source.to_string(),
        params,
    }
}

/// Build a delete-index request.
pub fn delete_index(index: &str) -> DeleteIndexRequest {
    DeleteIndexRequest {
        index: index.to_string(),
    }
}

/// Build an index-exists request.
pub fn index_exists(index: &str) -> IndexExistsRequest {
    IndexExistsRequest {
        index: index.to_string(),
    }
}

/// Build a bulk-delete request for exactly the given ids.
pub fn bulk_delete(index: &str, ids: &[String]) -> BulkDeleteRequest {
    BulkDeleteRequest {
        index: index.to_string(),
        ids: ids.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_repository_shared::{FieldDescriptor, FieldKind};

    struct Book;

    impl IndexedDocument for Book {
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("author"),
            FieldDescriptor::new("title"),
            FieldDescriptor::new("launchYear").with_kind(FieldKind::Long),
        ];
    }

    #[test]
    fn create_index_maps_every_schema_field() {
        let request = create_index::<Book>("books");

        assert_eq!(request.index, "books");
        let properties = &request.body["mappings"]["properties"];
        assert_eq!(properties.as_object().unwrap().len(), 3);
        assert!(properties["author"]["text"].is_object());
        assert!(properties["title"]["text"].is_object());
        assert!(properties["launchYear"]["long"].is_object());
    }

    #[test]
    fn create_index_nests_each_field_as_its_own_sub_field() {
        let request = create_index::<Book>("books");

        let properties = &request.body["mappings"]["properties"];
        assert!(properties["author"]["text"]["fields"]["author"]["text"].is_object());
        assert!(properties["launchYear"]["long"]["fields"]["launchYear"]["long"].is_object());
    }

    #[test]
    fn multi_get_has_one_doc_per_index_sharing_the_id() {
        let request = multi_get("id-1", &["books", "archive"]);
        let body = request.body();

        let docs = body["docs"].as_array().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["_index"], "books");
        assert_eq!(docs[1]["_index"], "archive");
        assert!(docs.iter().all(|doc| doc["_id"] == "id-1"));
    }

    #[test]
    fn search_template_without_params_omits_the_key() {
        let request = search_template("books", r#"{"query": {"match_all": {}}}"#, None);
        let body = request.body();

        assert_eq!(body["source"], r#"{"query": {"match_all": {}}}"#);
        assert!(body.get("params").is_none());
    }

    #[test]
    fn search_template_with_params_carries_the_bindings() {
        let mut params = Map::new();
        params.insert("launchYear".to_string(), json!(1977));
        let request = search_template("books", "{{launchYear}}", Some(params));
        let body = request.body();

        assert_eq!(body["params"]["launchYear"], 1977);
    }

    #[test]
    fn bulk_delete_builds_one_operation_per_id_in_order() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let request = bulk_delete("books", &ids);
        let operations = request.operations();

        assert_eq!(operations.len(), 3);
        assert_eq!(operations[0]["delete"]["_id"], "a");
        assert_eq!(operations[1]["delete"]["_id"], "b");
        assert_eq!(operations[2]["delete"]["_id"], "c");
        assert!(operations
            .iter()
            .all(|op| op["delete"]["_index"] == "books"));
    }

    #[test]
    fn index_document_serializes_the_payload() {
        #[derive(serde::Serialize)]
        struct Doc {
            title: String,
        }

        let request = index_document(
            "books",
            "id-1",
            &Doc {
                title: "Dune".to_string(),
            },
        )
        .unwrap();

        assert_eq!(request.index, "books");
        assert_eq!(request.id, "id-1");
        assert_eq!(request.document["title"], "Dune");
    }
}
