//! Plugins and the registry of plugins held by a kernel.

use super::arguments::KernelArguments;
use super::function::{FunctionMetadata, FunctionResult, KernelFunction};
use crate::error::{FunctionError, KernelError};
use crate::kernel::Kernel;
use crate::services::PromptExecutionSettings;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// A named, described collection of functions registered together.
#[derive(Clone, Default)]
pub struct KernelPlugin {
    /// Plugin name, stamped on every function it registers.
    pub name: String,
    /// Plugin description.
    pub description: String,
    functions: Vec<Arc<dyn KernelFunction>>,
}

impl KernelPlugin {
    /// Creates an empty plugin.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            functions: Vec::new(),
        }
    }

    /// Adds a function.
    pub fn with_function(mut self, function: impl KernelFunction + 'static) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    /// Adds a shared function.
    pub fn add_function(&mut self, function: Arc<dyn KernelFunction>) {
        self.functions.push(function);
    }

    /// Returns the functions in registration order.
    pub fn functions(&self) -> &[Arc<dyn KernelFunction>] {
        &self.functions
    }
}

impl std::fmt::Debug for KernelPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .functions
            .iter()
            .map(|function| function.metadata().name.as_str())
            .collect::<Vec<_>>();
        f.debug_struct("KernelPlugin")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("functions", &names)
            .finish()
    }
}

/// A function as stored in the registry, with its metadata stamped by the owning plugin.
#[derive(Clone)]
pub struct RegisteredFunction {
    metadata: FunctionMetadata,
    function: Arc<dyn KernelFunction>,
}

impl RegisteredFunction {
    fn new(plugin_name: &str, function: Arc<dyn KernelFunction>) -> Self {
        let mut metadata = function.metadata().clone();
        metadata.plugin_name = Some(plugin_name.to_owned());
        Self { metadata, function }
    }

    /// Returns the metadata, including the plugin name.
    pub fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    /// Returns the function name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the owning plugin name.
    pub fn plugin_name(&self) -> Option<&str> {
        self.metadata.plugin_name.as_deref()
    }

    /// Returns the underlying function.
    pub fn inner(&self) -> &dyn KernelFunction {
        self.function.as_ref()
    }
}

#[async_trait::async_trait]
impl KernelFunction for RegisteredFunction {
    fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    fn execution_settings(&self) -> &[PromptExecutionSettings] {
        self.function.execution_settings()
    }

    async fn invoke_core(
        &self,
        kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<FunctionResult, FunctionError> {
        self.function.invoke_core(kernel, arguments).await
    }
}

impl std::fmt::Debug for RegisteredFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredFunction")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct PluginEntry {
    name: String,
    description: String,
    functions: Vec<RegisteredFunction>,
}

/// Registry of plugins, in registration order.
///
/// Lookups take a read lock and registration takes a write lock, so of two racing
/// registrations of the same plugin name exactly one succeeds.
#[derive(Debug, Default)]
pub struct KernelPlugins {
    plugins: RwLock<Vec<PluginEntry>>,
}

impl KernelPlugins {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin and stamps its name on every function.
    pub fn add_plugin(&self, plugin: KernelPlugin) -> Result<(), KernelError> {
        let KernelPlugin {
            name,
            description,
            functions,
        } = plugin;
        if functions.is_empty() {
            return Err(KernelError::EmptyPlugin(name));
        }

        let mut function_names = HashSet::with_capacity(functions.len());
        if let Some(duplicate) = functions
            .iter()
            .map(|function| function.metadata().name.as_str())
            .find(|function_name| !function_names.insert(*function_name))
        {
            return Err(KernelError::DuplicateFunction {
                function: duplicate.to_owned(),
                plugin: name,
            });
        }

        let functions = functions
            .into_iter()
            .map(|function| RegisteredFunction::new(&name, function))
            .collect::<Vec<_>>();

        let mut plugins = self.plugins.write();
        if plugins.iter().any(|entry| entry.name == name) {
            return Err(KernelError::DuplicatePlugin(name));
        }
        tracing::debug!(
            target: "semkern",
            plugin = %name,
            functions = functions.len(),
            "plugin registered"
        );
        plugins.push(PluginEntry {
            name,
            description,
            functions,
        });
        Ok(())
    }

    /// Looks up a function.
    ///
    /// With a plugin name only that plugin is searched. Otherwise the first function
    /// with a matching name is returned, in plugin registration order.
    pub fn get_function(
        &self,
        function_name: &str,
        plugin_name: Option<&str>,
    ) -> Option<RegisteredFunction> {
        let plugins = self.plugins.read();
        plugins
            .iter()
            .filter(|entry| plugin_name.is_none_or(|name| entry.name == name))
            .flat_map(|entry| entry.functions.iter())
            .find(|function| function.name() == function_name)
            .cloned()
    }

    /// Returns every function, in plugin then function registration order.
    pub fn functions(&self) -> Vec<RegisteredFunction> {
        self.plugins
            .read()
            .iter()
            .flat_map(|entry| entry.functions.iter().cloned())
            .collect()
    }

    /// Returns the metadata of every function, in plugin then function registration order.
    pub fn get_functions_metadata(&self) -> Vec<FunctionMetadata> {
        self.plugins
            .read()
            .iter()
            .flat_map(|entry| entry.functions.iter().map(|f| f.metadata().clone()))
            .collect()
    }

    /// Returns the plugin names and descriptions in registration order.
    pub fn plugins(&self) -> Vec<(String, String)> {
        self.plugins
            .read()
            .iter()
            .map(|entry| (entry.name.clone(), entry.description.clone()))
            .collect()
    }

    /// Returns `true` if a plugin with the name is registered.
    pub fn contains_plugin(&self, name: &str) -> bool {
        self.plugins.read().iter().any(|entry| entry.name == name)
    }

    /// Returns the number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// Returns `true` if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}
