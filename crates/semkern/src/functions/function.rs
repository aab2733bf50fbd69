use super::arguments::KernelArguments;
use super::function_name::format_name;
use crate::contents::ChatMessage;
use crate::error::FunctionError;
use crate::kernel::Kernel;
use crate::services::PromptExecutionSettings;
use crate::{JsonValue, Map};
use serde::{Deserialize, Serialize};

/// Describes a function to the model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FunctionMetadata {
    /// Function name, unique within its plugin.
    pub name: String,
    /// Description shown to the model.
    pub description: String,
    /// Set by the registry to the name of the owning plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_name: Option<String>,
    /// JSON schema of the arguments object.
    pub parameters: JsonValue,
}

impl FunctionMetadata {
    /// Creates metadata for a function taking an arbitrary object.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            plugin_name: None,
            parameters: serde_json::json!({ "type": "object" }),
        }
    }

    /// Sets the parameter schema.
    pub fn with_parameters(mut self, parameters: JsonValue) -> Self {
        self.parameters = parameters;
        self
    }

    /// Formats `plugin{separator}name`.
    pub fn fully_qualified_name(&self, separator: char) -> String {
        format_name(&self.name, self.plugin_name.as_deref(), separator)
    }

    /// Returns `true` if this function is the one named by the pair.
    pub fn matches(&self, function_name: &str, plugin_name: Option<&str>) -> bool {
        self.name == function_name && self.plugin_name.as_deref() == plugin_name
    }
}

/// The value returned by a function.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FunctionValue {
    /// The function returned nothing.
    #[default]
    Empty,
    /// A JSON value.
    Json(JsonValue),
    /// A chat message, returned by prompt functions.
    Message(ChatMessage),
}

impl FunctionValue {
    /// Renders the value as text to feed back to the model.
    ///
    /// Strings are used verbatim, chat messages contribute their text content and
    /// anything else is serialized as JSON.
    pub fn to_result_text(&self) -> String {
        match self {
            FunctionValue::Empty => String::new(),
            FunctionValue::Json(JsonValue::String(s)) => s.clone(),
            FunctionValue::Json(value) => value.to_string(),
            FunctionValue::Message(message) => message.content().unwrap_or_default().to_owned(),
        }
    }

    /// Returns the JSON value, if any.
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            FunctionValue::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the chat message, if any.
    pub fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            FunctionValue::Message(message) => Some(message),
            _ => None,
        }
    }
}

impl From<JsonValue> for FunctionValue {
    fn from(value: JsonValue) -> Self {
        FunctionValue::Json(value)
    }
}

impl From<ChatMessage> for FunctionValue {
    fn from(message: ChatMessage) -> Self {
        FunctionValue::Message(message)
    }
}

/// The result of invoking a function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionResult {
    /// The returned value.
    pub value: FunctionValue,
    /// The prompt sent to the model, for prompt functions.
    pub rendered_prompt: Option<String>,
    /// Open key/value metadata.
    pub metadata: Map,
}

impl FunctionResult {
    /// Creates a result holding `value`.
    pub fn new(value: impl Into<FunctionValue>) -> Self {
        Self {
            value: value.into(),
            rendered_prompt: None,
            metadata: Map::new(),
        }
    }
}

/// A function that can be registered in a plugin and invoked by the model.
///
/// Implementations only provide the body; filters and plugin bookkeeping are applied
/// by the [`Kernel`].
#[async_trait::async_trait]
pub trait KernelFunction: Send + Sync {
    /// Returns the function metadata.
    fn metadata(&self) -> &FunctionMetadata;

    /// Returns the execution settings the function prefers, if any.
    fn execution_settings(&self) -> &[PromptExecutionSettings] {
        &[]
    }

    /// Runs the function body.
    async fn invoke_core(
        &self,
        kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<FunctionResult, FunctionError>;
}
