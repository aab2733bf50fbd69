use crate::Map;
use crate::function_choice::FunctionChoiceBehavior;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The key under which settings without a service id are stored.
pub const DEFAULT_SERVICE_ID: &str = "default";

/// Settings for one AI request, optionally pinned to a service or a model.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PromptExecutionSettings {
    /// Identifies the service these settings are configured for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Identifies the model these settings are configured for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Decides which functions are advertised and whether they are auto-invoked.
    #[serde(skip)]
    pub function_choice_behavior: Option<Arc<dyn FunctionChoiceBehavior>>,
    /// Provider-specific properties such as `temperature`.
    #[serde(flatten)]
    pub extension_data: Map,
}

impl PromptExecutionSettings {
    /// Creates empty settings, which act as the default entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the settings to a service id.
    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// Pins the settings to a model id.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Sets the function choice behavior.
    pub fn with_function_choice_behavior(
        mut self,
        behavior: impl FunctionChoiceBehavior + 'static,
    ) -> Self {
        self.function_choice_behavior = Some(Arc::new(behavior));
        self
    }

    /// Inserts a provider-specific property.
    pub fn with_extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::JsonValue>,
    ) -> Self {
        self.extension_data.insert(key.into(), value.into());
        self
    }

    /// Returns the key these settings are stored under.
    pub fn target_service_id(&self) -> &str {
        match self.service_id.as_deref() {
            Some(service_id) if !service_id.is_empty() => service_id,
            _ => DEFAULT_SERVICE_ID,
        }
    }

    /// Returns `true` for settings that are not pinned to a specific service.
    pub fn is_default(&self) -> bool {
        self.target_service_id() == DEFAULT_SERVICE_ID
    }
}
