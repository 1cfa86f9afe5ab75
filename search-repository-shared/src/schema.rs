//! Index schema declaration.
//!
//! A document type opts its fields into the index mapping by listing them in
//! a static descriptor table. Fields absent from the table are simply not
//! part of the schema. The table replaces runtime reflection: it is declared
//! once, at compile time, next to the type it describes.

use std::collections::BTreeMap;

use serde::Serialize;

/// Primitive kind of an indexed field.
///
/// The wire name (`text`, `long`) is what the search engine's mapping API
/// expects for the field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Full-text field. This is the default kind for a declared field.
    #[default]
    Text,
    /// 64-bit integer field.
    Long,
}

impl FieldKind {
    /// The kind's name as it appears in the index mapping.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Long => "long",
        }
    }
}

/// Declares one field of a document type as part of the index schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name, unique within a document type's descriptor table.
    pub name: &'static str,
    /// Primitive kind of the field in the index mapping.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Declare a field with the default kind (`text`).
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    /// Override the field's kind.
    pub const fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A document type whose fields can be mapped into an index schema.
///
/// Implementations list the indexed fields in `FIELDS`. Only listed fields
/// appear in the schema; everything else on the type is ignored by the
/// repository.
///
/// # Example
///
/// ```
/// use search_repository_shared::{FieldDescriptor, FieldKind, IndexedDocument};
///
/// struct Book {
///     author: String,
///     title: String,
///     launch_year: i64,
/// }
///
/// impl IndexedDocument for Book {
///     const FIELDS: &'static [FieldDescriptor] = &[
///         FieldDescriptor::new("author"),
///         FieldDescriptor::new("title"),
///         FieldDescriptor::new("launchYear").with_kind(FieldKind::Long),
///     ];
/// }
/// ```
pub trait IndexedDocument {
    /// The static field-descriptor table for this type.
    const FIELDS: &'static [FieldDescriptor];
}

/// An index mapping derived from a document type's descriptor table.
///
/// Built once per type, immutable afterwards. Field order is by name, which
/// makes the schema deterministic regardless of declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    fields: BTreeMap<&'static str, FieldKind>,
}

impl IndexSchema {
    /// Build the schema for a document type.
    ///
    /// One entry per descriptor, keyed by field name. Duplicate names are
    /// not rejected; a later descriptor overwrites an earlier one.
    pub fn of<T: IndexedDocument + ?Sized>() -> Self {
        let mut fields = BTreeMap::new();
        for descriptor in T::FIELDS {
            fields.insert(descriptor.name, descriptor.kind);
        }
        Self { fields }
    }

    /// Iterate over the `(name, kind)` pairs of the schema.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldKind)> + '_ {
        self.fields.iter().map(|(name, kind)| (*name, *kind))
    }

    /// Look up the kind of a field, if it is part of the schema.
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Number of fields in the schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Book {
        #[allow(dead_code)]
        author: String,
        #[allow(dead_code)]
        title: String,
        #[allow(dead_code)]
        launch_year: i64,
        // Not declared below, must stay out of the schema.
        #[allow(dead_code)]
        shelf_position: u32,
    }

    impl IndexedDocument for Book {
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("author"),
            FieldDescriptor::new("title"),
            FieldDescriptor::new("launchYear").with_kind(FieldKind::Long),
        ];
    }

    #[test]
    fn schema_has_one_entry_per_declared_field() {
        let schema = IndexSchema::of::<Book>();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.kind_of("author"), Some(FieldKind::Text));
        assert_eq!(schema.kind_of("title"), Some(FieldKind::Text));
        assert_eq!(schema.kind_of("launchYear"), Some(FieldKind::Long));
    }

    #[test]
    fn undeclared_fields_are_excluded() {
        let schema = IndexSchema::of::<Book>();

        assert_eq!(schema.kind_of("shelf_position"), None);
    }

    #[test]
    fn kind_defaults_to_text() {
        let descriptor = FieldDescriptor::new("author");

        assert_eq!(descriptor.kind, FieldKind::Text);
        assert_eq!(FieldKind::default(), FieldKind::Text);
    }

    #[test]
    fn schema_is_deterministic() {
        let first = IndexSchema::of::<Book>();
        let second = IndexSchema::of::<Book>();

        assert_eq!(first, second);
        let first_fields: Vec<_> = first.fields().collect();
        let second_fields: Vec<_> = second.fields().collect();
        assert_eq!(first_fields, second_fields);
    }

    #[test]
    fn later_duplicate_descriptor_wins() {
        struct Dup;

        impl IndexedDocument for Dup {
            const FIELDS: &'static [FieldDescriptor] = &[
                FieldDescriptor::new("year"),
                FieldDescriptor::new("year").with_kind(FieldKind::Long),
            ];
        }

        let schema = IndexSchema::of::<Dup>();

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.kind_of("year"), Some(FieldKind::Long));
    }

    #[test]
    fn wire_names() {
        assert_eq!(FieldKind::Text.as_str(), "text");
        assert_eq!(FieldKind::Long.as_str(), "long");
    }
}
