//! Typed OVSDB database schema.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A database schema: name, version and tables.
///
/// Tables and columns are kept in ordered maps so that anything iterating
/// the schema sees a stable order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseSchema {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub cksum: Option<String>,
    pub tables: BTreeMap<String, TableSchema>,
}

impl DatabaseSchema {
    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub columns: BTreeMap<String, ColumnSchema>,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub max_rows: Option<u64>,
    #[serde(default)]
    pub indexes: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnSchema {
    #[serde(rename = "type")]
    pub ty: ColumnType,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default = "default_mutable")]
    pub mutable: bool,
}

fn default_mutable() -> bool {
    true
}

impl ColumnSchema {
    /// Column with a bare atomic type
    pub fn atomic(type_name: impl Into<String>) -> Self {
        Self::new(ColumnType::Atomic(type_name.into()))
    }

    pub fn new(ty: ColumnType) -> Self {
        Self {
            ty,
            ephemeral: false,
            mutable: true,
        }
    }
}

/// Column type: either a bare atomic type name or a key/value/min/max object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColumnType {
    Atomic(String),
    Complex(ComplexType),
}

/// How a complex column is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexKind {
    /// Exactly one value, same as an atomic column
    Scalar,
    /// Zero or one value
    Optional,
    /// Any number of keys
    Set,
    /// Key to value pairs
    Map,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComplexType {
    pub key: BaseType,
    #[serde(default)]
    pub value: Option<BaseType>,
    #[serde(default = "default_min")]
    pub min: u64,
    #[serde(default)]
    pub max: Max,
}

fn default_min() -> u64 {
    1
}

impl ComplexType {
    /// Classify the column from its value type and cardinality.
    pub fn kind(&self) -> ComplexKind {
        if self.value.is_some() {
            return ComplexKind::Map;
        }
        match (self.min, self.max) {
            (0, Max::Limited(1)) => ComplexKind::Optional,
            (_, Max::Limited(1)) => ComplexKind::Scalar,
            _ => ComplexKind::Set,
        }
    }
}

/// Maximum number of elements in a complex column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawMax")]
pub enum Max {
    Limited(u64),
    Unlimited,
}

impl Default for Max {
    fn default() -> Self {
        Max::Limited(1)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMax {
    Number(u64),
    Word(String),
}

impl TryFrom<RawMax> for Max {
    type Error = String;

    fn try_from(raw: RawMax) -> Result<Self, Self::Error> {
        match raw {
            RawMax::Number(n) => Ok(Max::Limited(n)),
            RawMax::Word(word) if word == "unlimited" => Ok(Max::Unlimited),
            RawMax::Word(word) => Err(format!(
                "invalid max '{word}', expected a number or \"unlimited\""
            )),
        }
    }
}

/// Element type of a column, with its optional constraints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawBaseType")]
pub struct BaseType {
    /// Wire type name (`integer`, `real`, `boolean`, `string`, `uuid`)
    pub type_name: String,
    pub enumeration: Option<serde_json::Value>,
    pub ref_table: Option<String>,
    pub ref_type: Option<String>,
    pub min_integer: Option<i64>,
    pub max_integer: Option<i64>,
    pub min_real: Option<f64>,
    pub max_real: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}

impl BaseType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBaseType {
    Name(String),
    Full(FullBaseType),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullBaseType {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(rename = "enum", default)]
    enumeration: Option<serde_json::Value>,
    #[serde(default)]
    ref_table: Option<String>,
    #[serde(default)]
    ref_type: Option<String>,
    #[serde(default)]
    min_integer: Option<i64>,
    #[serde(default)]
    max_integer: Option<i64>,
    #[serde(default)]
    min_real: Option<f64>,
    #[serde(default)]
    max_real: Option<f64>,
    #[serde(default)]
    min_length: Option<u64>,
    #[serde(default)]
    max_length: Option<u64>,
}

impl From<RawBaseType> for BaseType {
    fn from(raw: RawBaseType) -> Self {
        match raw {
            RawBaseType::Name(type_name) => BaseType::new(type_name),
            RawBaseType::Full(full) => BaseType {
                type_name: full.type_name,
                enumeration: full.enumeration,
                ref_table: full.ref_table,
                ref_type: full.ref_type,
                min_integer: full.min_integer,
                max_integer: full.max_integer,
                min_real: full.min_real,
                max_real: full.max_real,
                min_length: full.min_length,
                max_length: full.max_length,
            },
        }
    }
}
