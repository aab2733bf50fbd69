//! Prompt templates rendered against kernel arguments.

use crate::functions::KernelArguments;
use crate::kernel::Kernel;
use serde::{Deserialize, Serialize};

mod jinja;
mod passthrough;

pub use jinja::JinjaPromptTemplate;
pub use passthrough::PassThroughPromptTemplate;

/// Supported template formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    /// The template text is used as the prompt without substitution.
    #[default]
    PassThrough,
    /// MiniJinja templating with `{{ variable }}` syntax.
    Jinja,
}

/// A template together with the format it is written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplateConfig {
    /// The template source.
    pub template: String,
    /// The format the template is written in.
    #[serde(default)]
    pub template_format: TemplateFormat,
    /// Optional name of the prompt function built from this template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional description of the prompt function built from this template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PromptTemplateConfig {
    /// Creates a config for `template` in the given format.
    pub fn new(template: impl Into<String>, template_format: TemplateFormat) -> Self {
        Self {
            template: template.into(),
            template_format,
            name: None,
            description: None,
        }
    }

    /// Builds the template.
    pub fn create_template(&self) -> Result<Box<dyn PromptTemplate>, TemplateError> {
        let template: Box<dyn PromptTemplate> = match self.template_format {
            TemplateFormat::PassThrough => {
                Box::new(PassThroughPromptTemplate::new(self.template.clone()))
            }
            TemplateFormat::Jinja => Box::new(JinjaPromptTemplate::new(self.template.clone())?),
        };
        Ok(template)
    }
}

/// Renders a prompt from kernel arguments.
pub trait PromptTemplate: Send + Sync {
    /// Renders the template. Rendering has no side effects.
    fn render(
        &self,
        kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<String, TemplateError>;
}

/// Errors that can occur during template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A required variable is missing from the input.
    #[error("Missing required variable '{0}' in template")]
    MissingVariable(String),
    /// Template parsing failed due to syntax errors.
    #[error("Template parsing failed: {0}")]
    ParseError(String),
    /// Template formatting failed during execution.
    #[error("Template formatting failed: {0}")]
    FormatError(String),
}
