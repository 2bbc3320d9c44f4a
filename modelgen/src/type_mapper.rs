//! Mapping of OVSDB wire types to Rust types.

use modelgen_schema::{BaseType, ColumnSchema, ColumnType, ComplexKind};

use crate::{Error, Result};

/// Map an atomic wire type name to its Rust type.
///
/// Returns `None` for unrecognized names. Callers must surface that as an
/// error rather than emit an empty type.
pub fn atomic_type(type_name: &str) -> Option<&'static str> {
    match type_name {
        "integer" => Some("i64"),
        "real" => Some("f64"),
        "boolean" => Some("bool"),
        "string" => Some("String"),
        // References are kept as opaque UUID strings
        "uuid" => Some("String"),
        _ => None,
    }
}

/// Trait for mapping schema column types to language-specific type strings.
pub trait TypeMapper {
    /// Map an atomic wire type name, `None` if unrecognized
    fn map_atomic(&self, type_name: &str) -> Option<String>;

    /// Wrap a type for a column holding zero or one value
    fn map_optional(&self, inner: &str) -> String;

    /// Wrap a type for a column holding any number of values
    fn map_set(&self, inner: &str) -> String;

    /// Associative container from key type to value type
    fn map_map(&self, key: &str, value: &str) -> String;

    /// Resolve the field type of a column.
    ///
    /// `table` and `column` are only used to identify the offending column
    /// when a wire type cannot be mapped.
    fn field_type(&self, table: &str, column: &str, schema: &ColumnSchema) -> Result<String> {
        let base = |ty: &BaseType| base_type(self, table, column, &ty.type_name);
        match &schema.ty {
            ColumnType::Atomic(type_name) => base_type(self, table, column, type_name),
            ColumnType::Complex(complex) => {
                let key = base(&complex.key)?;
                match (complex.kind(), &complex.value) {
                    (ComplexKind::Map, Some(value)) => Ok(self.map_map(&key, &base(value)?)),
                    (ComplexKind::Optional, _) => Ok(self.map_optional(&key)),
                    (ComplexKind::Set, _) => Ok(self.map_set(&key)),
                    _ => Ok(key),
                }
            }
        }
    }
}

fn base_type<M: TypeMapper + ?Sized>(
    mapper: &M,
    table: &str,
    column: &str,
    type_name: &str,
) -> Result<String> {
    mapper
        .map_atomic(type_name)
        .ok_or_else(|| Error::UnknownType {
            table: table.to_string(),
            column: column.to_string(),
            type_name: type_name.to_string(),
        })
}

/// Rust type mapper implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTypeMapper;

impl TypeMapper for RustTypeMapper {
    fn map_atomic(&self, type_name: &str) -> Option<String> {
        atomic_type(type_name).map(str::to_string)
    }

    fn map_optional(&self, inner: &str) -> String {
        format!("Option<{}>", inner)
    }

    fn map_set(&self, inner: &str) -> String {
        format!("Vec<{}>", inner)
    }

    fn map_map(&self, key: &str, value: &str) -> String {
        format!("std::collections::BTreeMap<{}, {}>", key, value)
    }
}

#[cfg(test)]
mod tests {
    use modelgen_schema::{ComplexType, Max};

    use super::*;

    fn complex(key: &str, value: Option<&str>, min: u64, max: Max) -> ColumnSchema {
        ColumnSchema::new(ColumnType::Complex(ComplexType {
            key: BaseType::new(key),
            value: value.map(BaseType::new),
            min,
            max,
        }))
    }

    #[test]
    fn test_atomic_type() {
        let cases = [
            ("IntegerToInt", "integer", Some("i64")),
            ("RealToFloat", "real", Some("f64")),
            ("BooleanToBool", "boolean", Some("bool")),
            ("StringToString", "string", Some("String")),
            ("UUIDToString", "uuid", Some("String")),
            ("Invalid", "notAType", None),
        ];
        for (name, input, expected) in cases {
            assert_eq!(atomic_type(input), expected, "{name}");
        }
    }

    #[test]
    fn test_field_type_atomic() {
        let mapper = RustTypeMapper;
        let column = ColumnSchema::atomic("real");
        assert_eq!(mapper.field_type("t", "c", &column).unwrap(), "f64");
    }

    #[test]
    fn test_field_type_complex() {
        let mapper = RustTypeMapper;

        let scalar = complex("integer", None, 1, Max::Limited(1));
        assert_eq!(mapper.field_type("t", "c", &scalar).unwrap(), "i64");

        let optional = complex("string", None, 0, Max::Limited(1));
        assert_eq!(
            mapper.field_type("t", "c", &optional).unwrap(),
            "Option<String>"
        );

        let set = complex("uuid", None, 0, Max::Unlimited);
        assert_eq!(mapper.field_type("t", "c", &set).unwrap(), "Vec<String>");

        let map = complex("string", Some("integer"), 0, Max::Unlimited);
        assert_eq!(
            mapper.field_type("t", "c", &map).unwrap(),
            "std::collections::BTreeMap<String, i64>"
        );
    }

    #[test]
    fn test_field_type_unknown() {
        let mapper = RustTypeMapper;

        let err = mapper
            .field_type("Bridge", "name", &ColumnSchema::atomic("notAType"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType { ref table, ref column, ref type_name }
                if table == "Bridge" && column == "name" && type_name == "notAType"
        ));

        let bad_value = complex("string", Some("blob"), 0, Max::Unlimited);
        let err = mapper.field_type("Bridge", "other_config", &bad_value).unwrap_err();
        assert!(err.to_string().contains("blob"));
    }
}
