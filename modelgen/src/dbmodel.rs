//! Whole-database generation: one model file per table plus a model index.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use modelgen_core::{File, Normalizer, WriteResult, field_ident, file_name};
use modelgen_schema::DatabaseSchema;
use tracing::{debug, info};

use crate::{
    Config, Error, Result,
    builder::{TableTemplateBuilder, struct_name},
    context::{PACKAGE_NAME, STRUCT_NAME, TABLE_NAME, TemplateContext, Value},
    generator::Generator,
    template::{Hook, Template},
};

/// Name of the database in the model index context
pub const DATABASE_NAME: &str = "DatabaseName";
/// Version of the schema in the model index context
pub const SCHEMA_VERSION: &str = "SchemaVersion";
/// List of table entries in the model index context
///
/// Each entry holds `TableName`, `StructName`, `ModuleName` and `FileName`.
pub const TABLES: &str = "Tables";
/// Module the table file is declared as
pub const MODULE_NAME: &str = "ModuleName";
/// File name of the table model, relative to the index
pub const FILE_NAME: &str = "FileName";

/// File name of the model index
pub const MODEL_FILE: &str = "model.rs";

const MODEL_HOOKS: &[Hook] = &[Hook::PreStruct, Hook::PostStruct];

const MODEL_TEMPLATE: &str = r#"//! Code generated by "modelgen"
//! DO NOT EDIT.

{{#each Tables}}
#[path = {{quote FileName}}]
mod {{ModuleName}};
{{/each}}

pub mod {{PackageName}} {
{{#each Tables}}
pub use super::{{ModuleName}}::{{../PackageName}}::{{StructName}};
{{/each}}

{{> preStructDefinitions}}

/// Name of the database the models were generated from
pub const DATABASE_NAME: &str = {{quote DatabaseName}};

/// Version of the schema the models were generated from
pub const SCHEMA_VERSION: &str = {{quote SchemaVersion}};

/// Table name and struct name of every generated model
pub const MODELS: &[(&str, &str)] = &[
{{#each Tables}}
    ({{quote TableName}}, {{quote StructName}}),
{{/each}}
];

/// A row of any table of the database
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
{{#each Tables}}
    {{StructName}}({{StructName}}),
{{/each}}
}

impl Model {
    /// Empty row of a table, `None` if the database has no such table
    pub fn new(table: &str) -> ::core::option::Option<Self> {
        match table {
{{#each Tables}}
            {{quote TableName}} => ::core::option::Option::Some(
                Self::{{StructName}}(<{{StructName}} as ::core::default::Default>::default()),
            ),
{{/each}}
            _ => ::core::option::Option::None,
        }
    }

    /// Name of the table the row belongs to
    pub fn table_name(&self) -> &'static str {
        match *self {
{{#each Tables}}
            Self::{{StructName}}(_) => {{quote TableName}},
{{/each}}
        }
    }
}

/// Empty row of every table, keyed by table name
pub fn full_database_model() -> ::std::collections::BTreeMap<&'static str, Model> {
    MODELS
        .iter()
        .filter_map(|&(table, _)| Model::new(table).map(|model| (table, model)))
        .collect()
}

{{> postStructDefinitions}}
}
"#;

/// Build the model index template for a database.
pub fn new_database_model_template(
    package: &str,
    schema: &DatabaseSchema,
) -> Result<(Template, TemplateContext)> {
    database_model_template(package, schema, &Normalizer::default())
}

fn database_model_template(
    package: &str,
    schema: &DatabaseSchema,
    normalizer: &Normalizer,
) -> Result<(Template, TemplateContext)> {
    let tables = schema
        .tables
        .keys()
        .map(|table| -> Result<Value> {
            let entry = IndexMap::from([
                (TABLE_NAME.to_string(), Value::from(table.as_str())),
                (
                    STRUCT_NAME.to_string(),
                    Value::from(struct_name(normalizer, table)?),
                ),
                (MODULE_NAME.to_string(), Value::from(field_ident(table))),
                (FILE_NAME.to_string(), Value::from(file_name(table))),
            ]);
            Ok(Value::Map(entry))
        })
        .collect::<Result<Vec<Value>>>()?;

    let mut ctx = TemplateContext::new();
    ctx.insert(PACKAGE_NAME, package);
    ctx.insert(DATABASE_NAME, schema.name.as_str());
    ctx.insert(SCHEMA_VERSION, schema.version.as_str());
    ctx.insert(TABLES, tables);

    let template = Template::new(MODEL_FILE, MODEL_TEMPLATE, MODEL_HOOKS)?;
    Ok((template, ctx))
}

/// A generated file for preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    /// Relative path from the output directory
    pub path: PathBuf,
    /// Formatted file content
    pub content: Vec<u8>,
}

/// Result of generating a whole database
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateResult {
    /// Files written to disk
    pub written: Vec<PathBuf>,
    /// Files validated but not written (dry run)
    pub skipped: Vec<PathBuf>,
}

type Extension<'a> = Box<dyn Fn(&str, &mut Template, &mut TemplateContext) -> Result<()> + 'a>;

/// Generates every table model of a database plus the model index.
///
/// Each table gets a fresh template from [`TableTemplateBuilder`]; an
/// optional extension callback can redefine hooks and add context keys
/// before the table is rendered.
pub struct DatabaseGenerator<'a> {
    schema: &'a DatabaseSchema,
    builder: TableTemplateBuilder,
    package: String,
    normalizer: Normalizer,
    extension: Option<Extension<'a>>,
}

impl<'a> DatabaseGenerator<'a> {
    pub fn new(package: impl Into<String>, schema: &'a DatabaseSchema) -> Self {
        let package = package.into();
        Self {
            schema,
            builder: TableTemplateBuilder::new(package.clone()),
            package,
            normalizer: Normalizer::default(),
            extension: None,
        }
    }

    /// Create a generator using the package and acronyms of a configuration.
    pub fn from_config(config: &Config, schema: &'a DatabaseSchema) -> Self {
        Self::new(config.package.clone(), schema).normalizer(config.normalizer())
    }

    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.builder = self.builder.normalizer(normalizer.clone());
        self.normalizer = normalizer;
        self
    }

    /// Customize every table template before it is rendered.
    ///
    /// The callback receives the table name, the template and its context.
    pub fn extend(
        mut self,
        f: impl Fn(&str, &mut Template, &mut TemplateContext) -> Result<()> + 'a,
    ) -> Self {
        self.extension = Some(Box::new(f));
        self
    }

    /// Render and validate every file without writing to disk.
    ///
    /// Table files come first, in table name order, followed by the model index.
    pub fn preview(&self, generator: &Generator) -> Result<Vec<PreviewFile>> {
        let mut files = Vec::with_capacity(self.schema.tables.len() + 1);
        let mut owners: HashMap<PathBuf, &str> = HashMap::new();

        for (table_name, table) in &self.schema.tables {
            let path = PathBuf::from(file_name(table_name));
            if let Some(first) = owners.insert(path.clone(), table_name) {
                return Err(Error::DuplicateFile {
                    path,
                    first: first.to_string(),
                    second: table_name.clone(),
                });
            }

            let (mut template, mut ctx) = self.builder.build(table_name, table)?;
            if let Some(extension) = &self.extension {
                extension(table_name.as_str(), &mut template, &mut ctx)?;
            }
            debug!(table = %table_name, path = %path.display(), "rendering table model");
            let content = generator.format(&template, &ctx)?;
            files.push(PreviewFile { path, content });
        }

        let path = PathBuf::from(MODEL_FILE);
        if let Some(first) = owners.get(&path) {
            return Err(Error::DuplicateFile {
                path,
                first: first.to_string(),
                second: self.schema.name.clone(),
            });
        }
        let (template, ctx) =
            database_model_template(&self.package, self.schema, &self.normalizer)?;
        let content = generator.format(&template, &ctx)?;
        files.push(PreviewFile { path, content });

        Ok(files)
    }

    /// Generate every file into `output_dir`.
    ///
    /// All files are rendered and validated before the first one is written,
    /// and the set is written all or nothing.
    pub fn generate(&self, generator: &Generator, output_dir: &Path) -> Result<GenerateResult> {
        let files: Vec<File> = self
            .preview(generator)?
            .into_iter()
            .map(|preview| File::new(output_dir.join(&preview.path), preview.content))
            .collect();
        let paths: Vec<PathBuf> = files.iter().map(|file| file.path().to_path_buf()).collect();

        let mut result = GenerateResult::default();
        match generator.persist_all(&files)? {
            WriteResult::Written => result.written = paths,
            WriteResult::DryRun => result.skipped = paths,
        }

        info!(
            database = %self.schema.name,
            written = result.written.len(),
            skipped = result.skipped.len(),
            "database models generated"
        );
        Ok(result)
    }
}
