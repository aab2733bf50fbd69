//! The kernel ties together plugins, services and filters.

use crate::config::KernelConfig;
use crate::contents::{ChatHistory, ChatMessage};
use crate::error::{FunctionError, KernelError};
use crate::function_calling::FunctionCallingLoop;
use crate::functions::{
    FunctionInvocationContext, FunctionInvocationFilter, FunctionResult, KernelArguments,
    KernelFunction, KernelFunctionFromPrompt, KernelPlugin, KernelPlugins, Next,
};
use crate::services::{
    ChatCompletionService, PromptExecutionSettings, ServiceProvider, ServiceType,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// The composition root: a registry of plugins, a registry of services and the
/// function invocation filters.
///
/// Registration takes `&self`, so a kernel can be shared behind an [`Arc`] by concurrent
/// orchestration runs.
#[derive(Default)]
pub struct Kernel {
    plugins: KernelPlugins,
    services: ServiceProvider,
    filters: RwLock<Vec<Arc<dyn FunctionInvocationFilter>>>,
    config: KernelConfig,
}

impl Kernel {
    /// Creates an empty kernel with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty kernel with the config.
    pub fn with_config(config: KernelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns a builder.
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Returns the config.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Returns the plugin registry.
    pub fn plugins(&self) -> &KernelPlugins {
        &self.plugins
    }

    /// Returns the service registry.
    pub fn services(&self) -> &ServiceProvider {
        &self.services
    }

    /// Registers a plugin.
    pub fn add_plugin(&self, plugin: KernelPlugin) -> Result<(), KernelError> {
        self.plugins.add_plugin(plugin)
    }

    /// Registers a chat completion service.
    pub fn add_service(
        &self,
        service: impl ChatCompletionService + 'static,
    ) -> Result<(), KernelError> {
        self.services.add_service(Arc::new(service))
    }

    /// Appends a function invocation filter. Filters run in the order they were added.
    pub fn add_function_invocation_filter(&self, filter: impl FunctionInvocationFilter + 'static) {
        self.filters.write().push(Arc::new(filter));
    }

    /// Invokes a function through the filter chain.
    pub async fn invoke(
        &self,
        function: &dyn KernelFunction,
        arguments: KernelArguments,
    ) -> Result<FunctionResult, FunctionError> {
        let filters = self.filters.read().clone();
        let metadata = function.metadata();
        tracing::debug!(
            target: "semkern",
            function = %metadata.fully_qualified_name(self.config.function_name_separator),
            filters = filters.len(),
            "invoking function"
        );

        let mut context = FunctionInvocationContext {
            kernel: self,
            function: metadata,
            arguments,
            result: FunctionResult::default(),
        };
        Next::new(&filters, function).run(&mut context).await?;
        Ok(context.result)
    }

    /// Renders `template` in the default template format, sends it to a chat completion
    /// service and returns the assistant message as the result value.
    pub async fn invoke_prompt(
        &self,
        template: &str,
        arguments: KernelArguments,
    ) -> Result<FunctionResult, KernelError> {
        let function =
            KernelFunctionFromPrompt::new(template, self.config.default_template_format)?;
        self.invoke(&function, arguments).await.map_err(|err| match err {
            FunctionError::Kernel(err) => *err,
            err => KernelError::Function(err),
        })
    }

    /// Runs the function calling loop on `chat_history` with the service selected for
    /// `settings`, and returns the final assistant message.
    pub async fn get_chat_message_content(
        &self,
        chat_history: &mut ChatHistory,
        settings: Option<&PromptExecutionSettings>,
    ) -> Result<ChatMessage, KernelError> {
        let candidates = settings.map(std::slice::from_ref).unwrap_or_default();
        let selection = self
            .services
            .try_select(ServiceType::ChatCompletion, candidates)
            .ok_or(KernelError::ServiceNotFound(ServiceType::ChatCompletion))?;
        FunctionCallingLoop::new(selection.service.as_ref())
            .with_kernel(self)
            .with_settings(selection.settings.as_ref())
            .run(chat_history)
            .await
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("plugins", &self.plugins)
            .field("services", &self.services)
            .field("filters", &self.filters.read().len())
            .field("config", &self.config)
            .finish()
    }
}

/// A builder for creating a kernel
///
/// # Example
/// ```
/// use semkern::{Kernel, KernelConfig, KernelPlugin, functions::helpers};
///
/// let kernel = Kernel::builder()
///     .config(KernelConfig::default())
///     .plugin(
///         KernelPlugin::new("clock", "Tells the time")
///             .with_function(helpers::no_param("now", "Current time", || "noon".to_owned())),
///     )
///     .build()
///     .unwrap();
/// assert!(kernel.plugins().get_function("now", Some("clock")).is_some());
/// ```
#[derive(Default)]
pub struct KernelBuilder {
    /// Kernel-wide settings
    config: KernelConfig,
    /// Plugins to register, in order
    plugins: Vec<KernelPlugin>,
    /// Chat completion services to register, in priority order
    services: Vec<Arc<dyn ChatCompletionService>>,
    /// Function invocation filters, outermost first
    filters: Vec<Arc<dyn FunctionInvocationFilter>>,
}

impl KernelBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kernel config
    pub fn config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a plugin
    pub fn plugin(mut self, plugin: KernelPlugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Add a chat completion service
    pub fn service(mut self, service: impl ChatCompletionService + 'static) -> Self {
        self.services.push(Arc::new(service));
        self
    }

    /// Add a function invocation filter
    pub fn filter(mut self, filter: impl FunctionInvocationFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Build the kernel, registering everything in the order it was added
    pub fn build(self) -> Result<Kernel, KernelError> {
        let kernel = Kernel::with_config(self.config);
        for plugin in self.plugins {
            kernel.plugins.add_plugin(plugin)?;
        }
        for service in self.services {
            kernel.services.add_service(service)?;
        }
        *kernel.filters.write() = self.filters;
        Ok(kernel)
    }
}
