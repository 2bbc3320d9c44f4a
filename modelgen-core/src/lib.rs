//! Core utilities for the modelgen code generator.
//!
//! This crate provides the identifier normalization rules and the file
//! persistence helpers used by the generator.

mod file;
mod naming;

// File operations
pub use file::{File, WriteError, WriteResult, write_all};
// Identifier normalization
pub use naming::{
    ACRONYMS, Acronyms, Normalizer, RESERVED_WORDS, camel_case, field_ident, field_name,
    file_name, is_reserved, struct_name, to_snake_case, type_ident,
};
