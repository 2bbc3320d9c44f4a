use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use modelgen_core::WriteError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("column '{column}' of table '{table}' has unsupported type '{type_name}'")]
    #[diagnostic(
        code(modelgen::unknown_type),
        help("supported types are: integer, real, boolean, string, uuid")
    )]
    UnknownType {
        table: String,
        column: String,
        type_name: String,
    },

    #[error("columns '{first}' and '{second}' of table '{table}' both generate field '{name}'")]
    #[diagnostic(code(modelgen::duplicate_field))]
    DuplicateField {
        table: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("table '{table}' does not produce a type name")]
    #[diagnostic(
        code(modelgen::invalid_table_name),
        help("table names need at least one character other than '_' and '-'")
    )]
    InvalidTableName { table: String },

    #[error("column '{column}' of table '{table}' does not produce a field name")]
    #[diagnostic(
        code(modelgen::invalid_column_name),
        help("column names need at least one character other than '_' and '-'")
    )]
    InvalidColumnName { table: String, column: String },

    #[error("tables '{first}' and '{second}' both generate '{path}'")]
    #[diagnostic(code(modelgen::duplicate_file))]
    DuplicateFile {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("unknown template hook '{name}'")]
    #[diagnostic(
        code(modelgen::unknown_hook),
        help("available hooks are: preStructDefinitions, extraFields, postStructDefinitions")
    )]
    UnknownHook { name: String },

    #[error("failed to parse template '{name}'")]
    #[diagnostic(code(modelgen::hook_parse))]
    HookParse {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("failed to render template '{name}'")]
    #[diagnostic(code(modelgen::render))]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("generated code is not valid Rust: {message}")]
    #[diagnostic(
        code(modelgen::format),
        help("check the content injected through template hooks")
    )]
    Format {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("failed to write '{path}'")]
    #[diagnostic(code(modelgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{path}'")]
    #[diagnostic(code(modelgen::config_io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(modelgen::config))]
    Config {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        filename: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Create a config parse error from a toml error with source context
    pub fn config(source: toml::de::Error, src: &str, filename: &str) -> Self {
        let span = source.span().map(SourceSpan::from);
        Error::Config {
            src: NamedSource::new(filename, src.to_string()),
            span,
            filename: filename.to_string(),
            source,
        }
    }

    /// Create a format error pointing at the offending position of the rendered text
    pub fn format(error: &syn::Error, rendered: &str, name: &str) -> Self {
        let start = error.span().start();
        let span = byte_offset(rendered, start.line, start.column)
            .map(|offset| SourceSpan::from((offset, 0)));
        Error::Format {
            src: NamedSource::new(name, rendered.to_string()),
            span,
            message: error.to_string(),
        }
    }

    /// Whether this error came from the validation pass
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }
}

impl From<WriteError> for Error {
    fn from(e: WriteError) -> Self {
        Error::Io {
            path: e.path,
            source: e.source,
        }
    }
}

/// Byte offset of a 1-based line and 0-based character column.
fn byte_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut offset = 0;
    for (i, text) in src.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = text
                .char_indices()
                .nth(column)
                .map_or(text.len(), |(idx, _)| idx);
            return Some(offset + within);
        }
        offset += text.len();
    }
    Some(src.len())
}
