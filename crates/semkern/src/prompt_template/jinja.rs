use super::{PromptTemplate, TemplateError};
use crate::functions::KernelArguments;
use crate::kernel::Kernel;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};

/// A MiniJinja template whose variables are the kernel arguments.
///
/// Referencing an argument that was not supplied is an error.
#[derive(Debug)]
pub struct JinjaPromptTemplate {
    template: String,
    env: Environment<'static>,
}

impl JinjaPromptTemplate {
    /// Parses the template.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_name| minijinja::AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.template_from_str(&template)
            .map_err(|e| TemplateError::ParseError(e.to_string()))?;
        Ok(Self { template, env })
    }
}

impl PromptTemplate for JinjaPromptTemplate {
    fn render(
        &self,
        _kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<String, TemplateError> {
        let template = self
            .env
            .template_from_str(&self.template)
            .map_err(|e| TemplateError::ParseError(e.to_string()))?;
        let context = minijinja::Value::from_serialize(arguments.arguments());
        template.render(context).map_err(|e| {
            if e.kind() == ErrorKind::UndefinedError {
                let mut missing = template
                    .undeclared_variables(false)
                    .into_iter()
                    .filter(|name| arguments.get(name).is_none())
                    .collect::<Vec<_>>();
                missing.sort();
                if let Some(name) = missing.into_iter().next() {
                    return TemplateError::MissingVariable(name);
                }
            }
            TemplateError::FormatError(e.to_string())
        })
    }
}
