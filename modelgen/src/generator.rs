//! Rendering, validation and persistence of templates.

use std::path::Path;

use modelgen_core::{File, WriteResult, write_all};
use tracing::{debug, info, warn};

use crate::{Config, Error, Result, context::TemplateContext, template::Template};

/// Renders templates to validated, formatted Rust source.
///
/// Rendered text is parsed as a Rust file and pretty-printed; anything that
/// does not parse is rejected and never written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generator {
    dry_run: bool,
}

impl Generator {
    /// Create a generator. In dry-run mode `generate` validates but writes nothing.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dry_run)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Render a template against its context, validate and format the result.
    pub fn format(&self, template: &Template, ctx: &TemplateContext) -> Result<Vec<u8>> {
        let rendered = template.render(ctx)?;
        let formatted = syn::parse_file(&rendered)
            .map(|file| prettyplease::unparse(&file))
            .map_err(|e| {
                warn!(template = template.name(), error = %e, "rendered code failed validation");
                Error::format(&e, &rendered, template.name())
            });
        // Span locations keep every parsed source alive on this thread until released
        proc_macro2::extra::invalidate_current_thread_spans();
        Ok(formatted?.into_bytes())
    }

    /// Format a template and write it to `dest`.
    ///
    /// Nothing is written unless formatting succeeds.
    pub fn generate(
        &self,
        dest: impl AsRef<Path>,
        template: &Template,
        ctx: &TemplateContext,
    ) -> Result<WriteResult> {
        let content = self.format(template, ctx)?;
        self.persist(&File::new(dest.as_ref(), content))
    }

    pub(crate) fn persist(&self, file: &File) -> Result<WriteResult> {
        let path = file.path();
        if self.dry_run {
            info!(path = %path.display(), "dry run, skipping write");
            debug!("{}", String::from_utf8_lossy(file.content()));
            return Ok(WriteResult::DryRun);
        }

        file.write()?;
        info!(path = %path.display(), "generated");
        Ok(WriteResult::Written)
    }

    /// Persist a set of files, all or nothing.
    pub(crate) fn persist_all(&self, files: &[File]) -> Result<WriteResult> {
        if self.dry_run {
            for file in files {
                info!(path = %file.path().display(), "dry run, skipping write");
                debug!("{}", String::from_utf8_lossy(file.content()));
            }
            return Ok(WriteResult::DryRun);
        }

        write_all(files)?;
        for file in files {
            info!(path = %file.path().display(), "generated");
        }
        Ok(WriteResult::Written)
    }
}
