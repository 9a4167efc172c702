//! Embedded Tera templates for table skeletons

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::variant::Layout;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Template file name for a layout
pub fn template_name(layout: Layout) -> &'static str {
    match layout {
        Layout::SelectionComparison => "selection.tex.tera",
        Layout::Experiments => "experiments.tex.tera",
    }
}

/// All table templates, parsed once
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// Load every embedded template
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let source = std::str::from_utf8(&content.data)
                    .map_err(|e| TemplateError::RenderError(format!("{}: {}", filename, e)))?;
                tera.add_raw_template(filename, source)
                    .map_err(|e| TemplateError::RenderError(describe(&e)))?;
            }
        }

        Ok(Self { tera })
    }

    pub fn has(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a named template with the given context
    pub fn render(&self, name: &str, context: &tera::Context) -> Result<String, TemplateError> {
        if !self.has(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::RenderError(describe(&e)))
    }
}

/// Tera nests the useful message in the error source chain
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
