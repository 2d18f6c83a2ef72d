//! What a permission check is asked about: a bare type, or a concrete object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A concrete object the engine can inspect through named field lookups.
///
/// The engine never looks at anything other than the fields named in rule
/// conditions.
pub trait Record {
    /// The type name rules are scoped by (e.g. `"Resource"`).
    fn type_name(&self) -> &str;

    /// Look up a field by name.
    fn field(&self, name: &str) -> Option<&Value>;
}

/// The target of a permission check.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    /// Type-level probe: conditions are treated as satisfied.
    Type(&'a str),
    /// Instance check: conditions are evaluated against the object.
    Object(&'a dyn Record),
}

impl<'a> Subject<'a> {
    pub fn type_name(&self) -> &'a str {
        match *self {
            Subject::Type(name) => name,
            Subject::Object(record) => record.type_name(),
        }
    }
}

impl std::fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Type(name) => f.debug_tuple("Type").field(name).finish(),
            Subject::Object(record) => f.debug_tuple("Object").field(&record.type_name()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Subject<'a> {
    fn from(name: &'a str) -> Self {
        Subject::Type(name)
    }
}

impl<'a, R: Record> From<&'a R> for Subject<'a> {
    fn from(record: &'a R) -> Self {
        Subject::Object(record)
    }
}

/// A JSON-backed record: `{"type": "Resource", "createdBy": "u2", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl Record for Document {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
