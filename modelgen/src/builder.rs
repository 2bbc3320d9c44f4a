//! Per-table template construction.

use std::collections::HashMap;

use modelgen_core::{Normalizer, field_ident, type_ident};
use modelgen_schema::TableSchema;
use tracing::debug;

use crate::{
    Error, Result,
    context::{
        FIELDS, FieldSpec, IDENTITY_COLUMN, PACKAGE_NAME, STRUCT_NAME, TABLE_NAME, TemplateContext,
    },
    template::{Hook, Template},
    type_mapper::{RustTypeMapper, TypeMapper},
};

const TABLE_TEMPLATE: &str = r#"//! Code generated by "modelgen"
//! DO NOT EDIT.

pub mod {{PackageName}} {
{{> preStructDefinitions}}

/// {{StructName}} defines an object in the {{TableName}} table
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct {{StructName}} {
{{#each Fields}}
    #[serde(rename = {{quote Tag}})]
    pub {{Ident}}: {{Type}},
{{/each}}
{{> extraFields}}
}

{{> postStructDefinitions}}
}
"#;

/// Builds a fresh [`Template`] and [`TemplateContext`] for one table.
///
/// # Example
///
/// ```ignore
/// let (mut template, mut ctx) = TableTemplateBuilder::new("nbdb").build("ACL", &table)?;
/// template.define(Hook::PostStruct, "pub const NAME: &str = {{quote TableName}};")?;
/// let code = Generator::new(false).format(&template, &ctx)?;
/// ```
#[derive(Debug, Clone)]
pub struct TableTemplateBuilder<M = RustTypeMapper> {
    package: String,
    normalizer: Normalizer,
    mapper: M,
}

impl TableTemplateBuilder {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            normalizer: Normalizer::default(),
            mapper: RustTypeMapper,
        }
    }
}

impl<M: TypeMapper> TableTemplateBuilder<M> {
    /// Use a custom normalizer (e.g., with extra acronyms)
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Use a custom type mapper
    pub fn type_mapper<N: TypeMapper>(self, mapper: N) -> TableTemplateBuilder<N> {
        TableTemplateBuilder {
            package: self.package,
            normalizer: self.normalizer,
            mapper,
        }
    }

    /// Compute the fields of a table: identity first, then ordered by name.
    pub fn fields(&self, table_name: &str, table: &TableSchema) -> Result<Vec<FieldSpec>> {
        let identity = FieldSpec::identity();
        let mut names = HashMap::from([(identity.name.clone(), IDENTITY_COLUMN)]);
        let mut idents = HashMap::from([(identity.ident.clone(), IDENTITY_COLUMN)]);

        let mut fields = Vec::with_capacity(table.columns.len() + 1);
        for (column, schema) in &table.columns {
            // An explicit identity column is folded into the identity field
            if column == IDENTITY_COLUMN {
                continue;
            }

            let field = FieldSpec {
                name: self.normalizer.normalize(column),
                ident: field_ident(column),
                ty: self.mapper.field_type(table_name, column, schema)?,
                tag: column.clone(),
            };
            if field.name.is_empty() || field.ident.is_empty() {
                return Err(Error::InvalidColumnName {
                    table: table_name.to_string(),
                    column: column.clone(),
                });
            }
            check_unique(&mut names, &field.name, column, table_name)?;
            check_unique(&mut idents, &field.ident, column, table_name)?;
            fields.push(field);
        }

        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields.insert(0, identity);
        Ok(fields)
    }

    /// Build the template and its context for a table.
    pub fn build(
        &self,
        table_name: &str,
        table: &TableSchema,
    ) -> Result<(Template, TemplateContext)> {
        let struct_name = struct_name(&self.normalizer, table_name)?;
        let fields = self.fields(table_name, table)?;
        debug!(
            table = table_name,
            struct_name = %struct_name,
            fields = fields.len(),
            "building table template"
        );

        let mut ctx = TemplateContext::new();
        ctx.insert(PACKAGE_NAME, self.package.as_str());
        ctx.insert(STRUCT_NAME, struct_name);
        ctx.insert(TABLE_NAME, table_name);
        ctx.insert(FIELDS, fields);

        let template = Template::new("table.rs", TABLE_TEMPLATE, &Hook::ALL)?;
        Ok((template, ctx))
    }
}

/// Rust type name of a table.
pub(crate) fn struct_name(normalizer: &Normalizer, table_name: &str) -> Result<String> {
    let name = type_ident(&normalizer.normalize(table_name));
    if name.is_empty() {
        return Err(Error::InvalidTableName {
            table: table_name.to_string(),
        });
    }
    Ok(name)
}

fn check_unique<'a>(
    seen: &mut HashMap<String, &'a str>,
    name: &str,
    column: &'a str,
    table: &str,
) -> Result<()> {
    if let Some(first) = seen.get(name) {
        return Err(Error::DuplicateField {
            table: table.to_string(),
            name: name.to_string(),
            first: first.to_string(),
            second: column.to_string(),
        });
    }
    seen.insert(name.to_string(), column);
    Ok(())
}

/// Build a table template with the default normalizer and type mapper.
pub fn new_table_template(
    package: &str,
    table_name: &str,
    table: &TableSchema,
) -> Result<(Template, TemplateContext)> {
    TableTemplateBuilder::new(package).build(table_name, table)
}

#[cfg(test)]
mod tests {
    use modelgen_core::Acronyms;
    use modelgen_schema::ColumnSchema;

    use super::*;

    fn table(columns: &[(&str, &str)]) -> TableSchema {
        TableSchema {
            columns: columns
                .iter()
                .map(|(name, ty)| (name.to_string(), ColumnSchema::atomic(*ty)))
                .collect(),
            ..TableSchema::default()
        }
    }

    #[test]
    fn test_fields_order() {
        let table = table(&[("str", "string"), ("int", "integer"), ("float", "real")]);
        let fields = TableTemplateBuilder::new("test")
            .fields("test", &table)
            .unwrap();

        insta::assert_debug_snapshot!(fields, @r###"
        [
            FieldSpec {
                name: "UUID",
                ident: "uuid",
                ty: "String",
                tag: "_uuid",
            },
            FieldSpec {
                name: "Float",
                ident: "float",
                ty: "f64",
                tag: "float",
            },
            FieldSpec {
                name: "Int",
                ident: "int",
                ty: "i64",
                tag: "int",
            },
            FieldSpec {
                name: "Str",
                ident: "str",
                ty: "String",
                tag: "str",
            },
        ]
        "###);
    }

    #[test]
    fn test_identity_without_columns() {
        let fields = TableTemplateBuilder::new("test")
            .fields("empty", &TableSchema::default())
            .unwrap();
        assert_eq!(fields, vec![FieldSpec::identity()]);
    }

    #[test]
    fn test_explicit_identity_column_is_folded() {
        let table = table(&[("_uuid", "uuid"), ("name", "string")]);
        let fields = TableTemplateBuilder::new("test")
            .fields("Bridge", &table)
            .unwrap();

        let tags: Vec<&str> = fields.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, ["_uuid", "name"]);
    }

    #[test]
    fn test_order_uses_normalized_name() {
        // "db" sorts before "dns" as a column but after it once normalized
        let table = table(&[("db", "string"), ("dns", "string")]);
        let fields = TableTemplateBuilder::new("test").fields("t", &table).unwrap();

        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["UUID", "DNS", "Db"]);
    }

    #[test]
    fn test_tag_keeps_original_column() {
        let table = table(&[("Foo_Bar", "string"), ("type", "integer")]);
        let fields = TableTemplateBuilder::new("test").fields("t", &table).unwrap();

        let foo = fields.iter().find(|f| f.name == "FooBar").unwrap();
        assert_eq!(foo.tag, "Foo_Bar");
        assert_eq!(foo.ident, "foo_bar");

        let ty = fields.iter().find(|f| f.name == "Type").unwrap();
        assert_eq!(ty.ident, "r#type");
        assert_eq!(ty.tag, "type");
    }

    #[test]
    fn test_duplicate_field() {
        let table = table(&[("foo_bar", "string"), ("foo-bar", "string")]);
        let err = TableTemplateBuilder::new("test").fields("t", &table).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateField { ref name, ref first, ref second, .. }
                if name == "FooBar" && first == "foo-bar" && second == "foo_bar"
        ));
    }

    #[test]
    fn test_column_clashing_with_identity() {
        let table = table(&[("uuid", "string")]);
        let err = TableTemplateBuilder::new("test").fields("t", &table).unwrap_err();
        assert!(matches!(err, Error::DuplicateField { ref first, .. } if first == "_uuid"));
    }

    #[test]
    fn test_unknown_type() {
        let table = table(&[("name", "string"), ("blob", "notAType")]);
        let err = new_table_template("test", "Bridge", &table).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType { ref table, ref column, ref type_name }
                if table == "Bridge" && column == "blob" && type_name == "notAType"
        ));
    }

    #[test]
    fn test_struct_name_is_a_valid_type() {
        let cases = [
            ("self", "Self_"),
            ("Self", "Self_"),
            ("9lives", "_9lives"),
            ("Open_vSwitch", "OpenVSwitch"),
        ];
        for (table_name, expected) in cases {
            let (_, ctx) = new_table_template("test", table_name, &table(&[])).unwrap();
            assert_eq!(ctx.get_str(STRUCT_NAME), Some(expected), "{table_name}");
        }
    }

    #[test]
    fn test_invalid_table_name() {
        for table_name in ["", "_", "-", "__"] {
            let err = new_table_template("test", table_name, &table(&[])).unwrap_err();
            assert!(
                matches!(err, Error::InvalidTableName { ref table } if table == table_name),
                "{table_name}: {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_column_name() {
        for column_name in ["_", "-", "_-_"] {
            let table = table(&[("name", "string"), (column_name, "string")]);
            let err = new_table_template("test", "Bridge", &table).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::InvalidColumnName { ref table, ref column }
                        if table == "Bridge" && column == column_name
                ),
                "{column_name}: {err:?}"
            );
        }
    }

    #[test]
    fn test_build_context() {
        let table = table(&[("ip_prefix", "string")]);
        let (template, ctx) =
            new_table_template("nbdb", "Logical_Router_Static_Route", &table).unwrap();

        assert_eq!(template.name(), "table.rs");
        assert_eq!(template.hooks(), &Hook::ALL);
        assert_eq!(
            ctx.keys().collect::<Vec<_>>(),
            [PACKAGE_NAME, STRUCT_NAME, TABLE_NAME, FIELDS]
        );
        assert_eq!(ctx.get_str(PACKAGE_NAME), Some("nbdb"));
        assert_eq!(ctx.get_str(STRUCT_NAME), Some("LogicalRouterStaticRoute"));
        assert_eq!(ctx.get_str(TABLE_NAME), Some("Logical_Router_Static_Route"));
        assert_eq!(ctx.fields().map(|f| f[1].name.as_str()), Some("IPPrefix"));
    }

    #[test]
    fn test_custom_normalizer() {
        let mut acronyms = Acronyms::default();
        acronyms.insert("lrp", "LRP");
        let table = table(&[("lrp_name", "string")]);

        let (_, ctx) = TableTemplateBuilder::new("nbdb")
            .normalizer(Normalizer::new(acronyms))
            .build("lrp", &table)
            .unwrap();

        assert_eq!(ctx.get_str(STRUCT_NAME), Some("LRP"));
        assert_eq!(ctx.fields().map(|f| f[1].name.as_str()), Some("LRPName"));
    }
}
