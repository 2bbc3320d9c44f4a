//! Database schema model for the modelgen code generator.
//!
//! The model mirrors the OVSDB schema JSON shape: a named, versioned
//! database made of tables, each table a map of columns, each column a
//! type that is either atomic (`"string"`) or complex (key, optional value,
//! cardinality bounds).

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod schema;

use std::path::Path;

pub use error::{Error, Result};
pub use schema::{
    BaseType, ColumnSchema, ColumnType, ComplexKind, ComplexType, DatabaseSchema, Max, TableSchema,
};

/// Parse a schema file from the given path
pub fn parse_file(path: impl AsRef<Path>) -> Result<DatabaseSchema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    parse_str_with_filename(&content, &filename)
}

/// Parse a schema from a string (uses "schema.json" as default filename)
pub fn parse_str(content: &str) -> Result<DatabaseSchema> {
    parse_str_with_filename(content, "schema.json")
}

/// Parse a schema from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<DatabaseSchema> {
    serde_json::from_str(content).map_err(|e| Error::parse(e, content, filename))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const ATOMIC_DB: &str = r#"
    {
        "name": "AtomicDB",
        "version": "0.0.0",
        "tables": {
            "atomicTable": {
                "columns": {
                    "str": {"type": "string"},
                    "int": {"type": "integer"},
                    "float": {"type": "real"}
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_str() {
        let schema = parse_str(ATOMIC_DB).unwrap();
        assert_eq!(schema.name, "AtomicDB");
        assert_eq!(schema.version, "0.0.0");

        let table = schema.table("atomicTable").unwrap();
        let columns: Vec<&str> = table.columns.keys().map(String::as_str).collect();
        assert_eq!(columns, ["float", "int", "str"]);
        assert_eq!(
            table.columns["int"].ty,
            ColumnType::Atomic("integer".to_string())
        );
        assert!(schema.table("missing").is_none());
    }

    #[test]
    fn test_parse_table_options() {
        let schema = parse_str(
            r#"{
                "name": "DB", "version": "1.2.3", "cksum": "123 456",
                "tables": {
                    "Bridge": {
                        "columns": {"name": {"type": "string", "mutable": false}},
                        "isRoot": true,
                        "maxRows": 10,
                        "indexes": [["name"]]
                    }
                }
            }"#,
        )
        .unwrap();

        let bridge = schema.table("Bridge").unwrap();
        assert!(bridge.is_root);
        assert_eq!(bridge.max_rows, Some(10));
        assert_eq!(bridge.indexes, vec![vec!["name".to_string()]]);
        assert_eq!(schema.cksum.as_deref(), Some("123 456"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_str_with_filename(r#"{"name": "DB"}"#, "db.json").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atomic.ovsschema");
        std::fs::write(&path, ATOMIC_DB).unwrap();

        let schema = parse_file(&path).unwrap();
        assert_eq!(schema.tables.len(), 1);
    }

    #[test]
    fn test_parse_file_missing() {
        let temp = TempDir::new().unwrap();
        let err = parse_file(temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
