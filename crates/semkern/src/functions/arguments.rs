use crate::error::KernelError;
use crate::services::PromptExecutionSettings;
use crate::{JsonValue, Map};

/// Arguments passed to a kernel function, plus optional execution settings.
///
/// Execution settings are kept in insertion order, keyed by their target service id.
#[derive(Clone, Debug, Default)]
pub struct KernelArguments {
    arguments: Map,
    execution_settings: Vec<PromptExecutionSettings>,
}

impl KernelArguments {
    /// Creates empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument.
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Sets an argument in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.arguments.insert(name.into(), value.into());
    }

    /// Attaches execution settings, rejecting two settings for the same service id.
    pub fn with_execution_settings(
        mut self,
        settings: impl IntoIterator<Item = PromptExecutionSettings>,
    ) -> Result<Self, KernelError> {
        for settings in settings {
            self.add_execution_settings(settings)?;
        }
        Ok(self)
    }

    /// Adds one execution settings entry.
    pub fn add_execution_settings(
        &mut self,
        settings: PromptExecutionSettings,
    ) -> Result<(), KernelError> {
        let service_id = settings.target_service_id();
        if self
            .execution_settings
            .iter()
            .any(|s| s.target_service_id() == service_id)
        {
            return Err(KernelError::DuplicateExecutionSettings(service_id.to_owned()));
        }
        self.execution_settings.push(settings);
        Ok(())
    }

    /// Returns an argument by name.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.arguments.get(name)
    }

    /// Returns a string argument by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(|v| v.as_str())
    }

    /// Returns all arguments.
    pub fn arguments(&self) -> &Map {
        &self.arguments
    }

    /// Returns the execution settings in insertion order.
    pub fn execution_settings(&self) -> &[PromptExecutionSettings] {
        &self.execution_settings
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Consumes `self` and returns the argument map.
    pub fn into_map(self) -> Map {
        self.arguments
    }
}

impl From<Map> for KernelArguments {
    fn from(arguments: Map) -> Self {
        Self {
            arguments,
            execution_settings: Vec::new(),
        }
    }
}
