//! Kernel functions whose body is a prompt sent to a chat completion service.

use super::arguments::KernelArguments;
use super::function::{FunctionMetadata, FunctionResult, KernelFunction};
use crate::contents::ChatHistory;
use crate::error::{FunctionError, KernelError};
use crate::function_calling::FunctionCallingLoop;
use crate::kernel::Kernel;
use crate::prompt_template::{PromptTemplate, PromptTemplateConfig, TemplateFormat};
use crate::services::{PromptExecutionSettings, ServiceType};
use uuid::Uuid;

/// A function that renders a template, sends it to a chat completion service and
/// returns the assistant message.
pub struct KernelFunctionFromPrompt {
    metadata: FunctionMetadata,
    template: Box<dyn PromptTemplate>,
    execution_settings: Vec<PromptExecutionSettings>,
}

impl KernelFunctionFromPrompt {
    /// Creates a function from a template in the given format.
    pub fn new(
        template: impl Into<String>,
        template_format: TemplateFormat,
    ) -> Result<Self, KernelError> {
        Self::from_config(PromptTemplateConfig::new(template, template_format))
    }

    /// Creates a function from a template config.
    ///
    /// Unnamed functions get a random `function_` name.
    pub fn from_config(config: PromptTemplateConfig) -> Result<Self, KernelError> {
        let template = config.create_template()?;
        let name = config
            .name
            .unwrap_or_else(|| format!("function_{}", Uuid::new_v4().simple()));
        let description = config
            .description
            .unwrap_or_else(|| "Generic function, unknown purpose".to_owned());
        Ok(Self {
            metadata: FunctionMetadata::new(name, description),
            template,
            execution_settings: Vec::new(),
        })
    }

    /// Renames the function.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = name.into();
        self
    }

    /// Sets the settings preferred by the function, which take precedence over the
    /// settings passed in the arguments.
    pub fn with_execution_settings(
        mut self,
        settings: impl IntoIterator<Item = PromptExecutionSettings>,
    ) -> Self {
        self.execution_settings = settings.into_iter().collect();
        self
    }

    async fn invoke_prompt(
        &self,
        kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<FunctionResult, KernelError> {
        let candidates: &[PromptExecutionSettings] = if self.execution_settings.is_empty() {
            arguments.execution_settings()
        } else {
            &self.execution_settings
        };
        let selection = kernel
            .services()
            .try_select(ServiceType::ChatCompletion, candidates)
            .ok_or(KernelError::ServiceNotFound(ServiceType::ChatCompletion))?;

        let rendered_prompt = self.template.render(kernel, arguments)?;
        tracing::debug!(
            target: "semkern",
            function = %self.metadata.name,
            service_id = selection.service.service_id(),
            "rendered prompt"
        );

        let mut chat_history = ChatHistory::new();
        chat_history.add_user_message(rendered_prompt.clone());
        let message = FunctionCallingLoop::new(selection.service.as_ref())
            .with_kernel(kernel)
            .with_settings(selection.settings.as_ref())
            .run(&mut chat_history)
            .await?;

        let mut result = FunctionResult::new(message);
        result.rendered_prompt = Some(rendered_prompt);
        Ok(result)
    }
}

impl std::fmt::Debug for KernelFunctionFromPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelFunctionFromPrompt")
            .field("metadata", &self.metadata)
            .field("execution_settings", &self.execution_settings)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl KernelFunction for KernelFunctionFromPrompt {
    fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    fn execution_settings(&self) -> &[PromptExecutionSettings] {
        &self.execution_settings
    }

    async fn invoke_core(
        &self,
        kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<FunctionResult, FunctionError> {
        Ok(self.invoke_prompt(kernel, arguments).await?)
    }
}
