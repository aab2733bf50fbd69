use super::{PromptTemplate, TemplateError};
use crate::functions::KernelArguments;
use crate::kernel::Kernel;

/// A template that renders to its own text.
#[derive(Debug, Clone)]
pub struct PassThroughPromptTemplate {
    template: String,
}

impl PassThroughPromptTemplate {
    /// Creates a new instance.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl PromptTemplate for PassThroughPromptTemplate {
    fn render(
        &self,
        _kernel: &Kernel,
        _arguments: &KernelArguments,
    ) -> Result<String, TemplateError> {
        Ok(self.template.clone())
    }
}
