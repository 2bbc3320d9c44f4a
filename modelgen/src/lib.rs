//! Generate typed Rust data models from OVSDB database schemas.
//!
//! # Module Organization
//!
//! - [`type_mapper`] - Wire type to Rust type mapping
//! - [`context`] - Data every template section renders against
//! - [`template`] - Skeleton templates with redefinable hooks
//! - [`builder`] - Per-table template construction
//! - [`generator`] - Rendering, validation and file output
//! - [`dbmodel`] - Whole-database generation and the model index
//!
//! # Example
//!
//! ```ignore
//! let schema = modelgen_schema::parse_file("ovn-nb.ovsschema")?;
//! let (mut template, mut ctx) = new_table_template("nbdb", "ACL", schema.table("ACL").unwrap())?;
//!
//! template.define(Hook::PostStruct, "pub fn {{FuncName}}() -> &'static str { \"bar\" }")?;
//! ctx.insert("FuncName", "test_func");
//!
//! Generator::new(false).generate("acl.rs", &template, &ctx)?;
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod builder;
mod config;
pub mod context;
pub mod dbmodel;
mod error;
pub mod generator;
pub mod template;
pub mod type_mapper;

pub use builder::{TableTemplateBuilder, new_table_template};
pub use config::{CONFIG_FILE, Config};
pub use context::{FieldSpec, TemplateContext, Value};
pub use dbmodel::{DatabaseGenerator, GenerateResult, PreviewFile, new_database_model_template};
pub use error::{Error, Result};
pub use generator::Generator;
pub use modelgen_core::{Acronyms, Normalizer, WriteResult};
pub use template::{Hook, Template};
pub use type_mapper::{RustTypeMapper, TypeMapper, atomic_type};
