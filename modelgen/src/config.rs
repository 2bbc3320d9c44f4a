//! Generator configuration loaded from `modelgen.toml`.

use std::{collections::BTreeMap, path::Path, str::FromStr};

use modelgen_core::{Acronyms, Normalizer};
use serde::Deserialize;

use crate::{Error, Result};

/// Default configuration filename
pub const CONFIG_FILE: &str = "modelgen.toml";

/// Generator configuration.
///
/// ```toml
/// package = "nbdb"
/// dry_run = false
///
/// [acronyms]
/// lsp = "LSP"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Module name the generated models live in
    #[serde(default = "default_package")]
    pub package: String,
    /// Validate without writing files
    #[serde(default)]
    pub dry_run: bool,
    /// Acronyms added to the built-in table, keyed by token
    #[serde(default)]
    pub acronyms: BTreeMap<String, String>,
}

fn default_package() -> String {
    "model".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: default_package(),
            dry_run: false,
            acronyms: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load a configuration file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a configuration with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e, content, filename))
    }

    /// Normalizer seeded with the built-in acronyms plus the configured ones.
    pub fn normalizer(&self) -> Normalizer {
        let mut acronyms = Acronyms::default();
        acronyms.extend(&self.acronyms);
        Normalizer::new(acronyms)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, CONFIG_FILE)
    }
}
