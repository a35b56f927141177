//! Documents and field paths.

use std::fmt;

use serde_json::{Map, Value};

/// Key under which a document's id is written next to its fields.
pub(crate) const ID_KEY: &str = "__id";

/// A keyed JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: String,
    fields: Map<String, Value>,
}

impl Document {
    /// Creates a document from its id and fields.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Unique key of the document within its collection.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The document's fields, without the id.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the document and returns its fields.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Looks up a possibly nested field. Every segment but the last must
    /// name a JSON object.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let (first, rest) = path.segments.split_first()?;
        rest.iter()
            .try_fold(self.fields.get(first)?, |value, segment| {
                value.as_object()?.get(segment)
            })
    }

    /// The stored form: the fields plus the id under `__id`.
    pub(crate) fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(ID_KEY.to_owned(), Value::String(self.id.clone()));
        Value::Object(object)
    }

    /// Splits a stored object back into id and fields. Objects without a
    /// string id fall back to `fallback_id` (the file stem).
    pub(crate) fn from_json(mut object: Map<String, Value>, fallback_id: &str) -> Self {
        let id = match object.remove(ID_KEY) {
            Some(Value::String(id)) => id,
            _ => fallback_id.to_owned(),
        };
        Self { id, fields: object }
    }
}

/// Path to a nested field, one segment per object level.
///
/// `FieldPath::parse("metadata.tenant")` and
/// `FieldPath::new(["metadata", "tenant"])` address the same field; the
/// latter keeps a segment containing a dot intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Builds a path from explicit segments. Segments are never split.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a dotted path into segments.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    /// The path's segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}
