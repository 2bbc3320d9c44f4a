//! Data handed to templates at render time.

use indexmap::IndexMap;
use serde::Serialize;

/// Package (module) name the generated code lives in
pub const PACKAGE_NAME: &str = "PackageName";
/// Normalized struct name of the table
pub const STRUCT_NAME: &str = "StructName";
/// Original table name
pub const TABLE_NAME: &str = "TableName";
/// Ordered [`FieldSpec`] list, identity field first
pub const FIELDS: &str = "Fields";

/// Column name of the row identifier
pub const IDENTITY_COLUMN: &str = "_uuid";

/// One generated struct field.
///
/// Serialized with PascalCase keys so templates read `{{Name}}`, `{{Ident}}`,
/// `{{Type}}` and `{{Tag}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldSpec {
    /// Exported, normalized name (e.g., "ExternalIDs")
    pub name: String,
    /// Rust field identifier (e.g., "external_ids")
    pub ident: String,
    /// Rust type expression
    #[serde(rename = "Type")]
    pub ty: String,
    /// Original column name, reproduced verbatim in the generated tag
    pub tag: String,
}

impl FieldSpec {
    /// The row identifier field present in every model
    pub fn identity() -> Self {
        Self {
            name: "UUID".to_string(),
            ident: "uuid".to_string(),
            ty: "String".to_string(),
            tag: IDENTITY_COLUMN.to_string(),
        }
    }
}

/// A context value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    Fields(Vec<FieldSpec>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&[FieldSpec]> {
        match self {
            Value::Fields(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<FieldSpec>> for Value {
    fn from(value: Vec<FieldSpec>) -> Self {
        Value::Fields(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

/// Ordered key/value data every template section renders against.
///
/// The builders fill in [`PACKAGE_NAME`], [`STRUCT_NAME`], [`TABLE_NAME`] and
/// [`FIELDS`]; callers may add any other key before rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: IndexMap<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, returning the previous value. Re-inserting keeps the key's position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The generated fields, if present
    pub fn fields(&self) -> Option<&[FieldSpec]> {
        self.get(FIELDS).and_then(Value::as_fields)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
