//! Composable templates with named extension hooks.

use std::{fmt, str::FromStr};

use handlebars::{Handlebars, handlebars_helper, no_escape};

use crate::{Error, Result, context::TemplateContext};

handlebars_helper!(quote: |value: str| format!("{value:?}"));

/// A named extension point of a template.
///
/// Hooks render as empty text unless redefined with [`Template::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Top-level declarations before the struct
    PreStruct,
    /// Additional fields appended after the generated ones
    ExtraFields,
    /// Top-level declarations after the struct
    PostStruct,
}

impl Hook {
    pub const ALL: [Hook; 3] = [Hook::PreStruct, Hook::ExtraFields, Hook::PostStruct];

    /// Name templates use to include the hook (`{{> name}}`)
    pub fn name(self) -> &'static str {
        match self {
            Hook::PreStruct => "preStructDefinitions",
            Hook::ExtraFields => "extraFields",
            Hook::PostStruct => "postStructDefinitions",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hook {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Hook::ALL
            .into_iter()
            .find(|hook| hook.name() == s)
            .ok_or_else(|| Error::UnknownHook {
                name: s.to_string(),
            })
    }
}

/// A fixed skeleton plus a set of redefinable hooks.
///
/// Every section, skeleton and hooks alike, renders against the full
/// [`TemplateContext`] passed at render time.
pub struct Template {
    name: &'static str,
    hooks: &'static [Hook],
    registry: Handlebars<'static>,
}

impl Template {
    /// Create a template from its skeleton. Every hook starts out empty.
    pub fn new(name: &'static str, skeleton: &str, hooks: &'static [Hook]) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.set_strict_mode(true);
        registry.register_helper("quote", Box::new(quote));
        registry
            .register_template_string(name, skeleton)
            .map_err(|e| Error::HookParse {
                name: name.to_string(),
                source: Box::new(e),
            })?;

        let mut template = Self {
            name,
            hooks,
            registry,
        };
        for &hook in hooks {
            template.define(hook, "")?;
        }
        Ok(template)
    }

    /// Template name, also used as the file name in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Hooks this template exposes
    pub fn hooks(&self) -> &'static [Hook] {
        self.hooks
    }

    /// Replace the content of a hook.
    ///
    /// The source is parsed immediately; on error the previous definition is kept.
    pub fn define(&mut self, hook: Hook, source: &str) -> Result<()> {
        if !self.hooks.contains(&hook) {
            return Err(Error::UnknownHook {
                name: hook.name().to_string(),
            });
        }
        self.registry
            .register_partial(hook.name(), source)
            .map_err(|e| Error::HookParse {
                name: hook.name().to_string(),
                source: Box::new(e),
            })
    }

    /// Replace the content of a hook given by name.
    pub fn define_named(&mut self, hook: &str, source: &str) -> Result<()> {
        self.define(hook.parse()?, source)
    }

    /// Render against a context, without validation.
    pub fn render(&self, ctx: &TemplateContext) -> Result<String> {
        self.registry
            .render(self.name, ctx)
            .map_err(|e| Error::Render {
                name: self.name.to_string(),
                source: Box::new(e),
            })
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
