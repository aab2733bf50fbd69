use crate::{JsonValue, Map};
use serde::{Deserialize, Serialize};

/// Basic text content.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TextContent {
    /// The text.
    pub text: String,
}

/// A request from the model to invoke one function.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FunctionCallContent {
    /// Correlates the request with its [`FunctionResultContent`].
    pub id: String,
    /// Name of the function to invoke.
    pub function_name: String,
    /// Name of the plugin the function belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_name: Option<String>,
    /// Arguments produced by the model.
    #[serde(default)]
    pub arguments: Map,
}

/// The outcome of one function call, fed back to the model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FunctionResultContent {
    /// Id of the call this result answers.
    pub call_id: String,
    /// Name of the invoked function.
    pub function_name: String,
    /// Name of the plugin the function belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_name: Option<String>,
    /// The function output, or an error text.
    pub result: JsonValue,
}

/// Describes responses from a provider which is either text or a function call.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantContent {
    /// Text for the user.
    Text(TextContent),
    /// A function the model wants invoked.
    FunctionCall(FunctionCallContent),
}

impl FunctionCallContent {
    /// Creates a function call request without a plugin name.
    pub fn new(id: impl Into<String>, function_name: impl Into<String>, arguments: Map) -> Self {
        Self {
            id: id.into(),
            function_name: function_name.into(),
            plugin_name: None,
            arguments,
        }
    }

    /// Sets the plugin name.
    pub fn with_plugin_name(mut self, plugin_name: impl Into<String>) -> Self {
        self.plugin_name = Some(plugin_name.into());
        self
    }
}

impl FunctionResultContent {
    /// Creates a result correlated with `call`.
    pub fn for_call(call: &FunctionCallContent, result: impl Into<JsonValue>) -> Self {
        Self {
            call_id: call.id.clone(),
            function_name: call.function_name.clone(),
            plugin_name: call.plugin_name.clone(),
            result: result.into(),
        }
    }

    /// Returns the result as text, without quoting plain strings.
    pub fn result_text(&self) -> String {
        match &self.result {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => String::new(),
            value => value.to_string(),
        }
    }
}

impl AssistantContent {
    /// Helper constructor to make creating assistant text content easier.
    pub fn text(text: impl Into<String>) -> Self {
        AssistantContent::Text(text.into().into())
    }

    /// Helper constructor to make creating assistant function call content easier.
    pub fn function_call(
        id: impl Into<String>,
        plugin_name: Option<&str>,
        function_name: impl Into<String>,
        arguments: Map,
    ) -> Self {
        AssistantContent::FunctionCall(FunctionCallContent {
            id: id.into(),
            function_name: function_name.into(),
            plugin_name: plugin_name.map(str::to_owned),
            arguments,
        })
    }
}

impl From<String> for TextContent {
    fn from(text: String) -> Self {
        TextContent { text }
    }
}

impl From<&str> for TextContent {
    fn from(text: &str) -> Self {
        text.to_owned().into()
    }
}

impl From<FunctionCallContent> for AssistantContent {
    fn from(call: FunctionCallContent) -> Self {
        AssistantContent::FunctionCall(call)
    }
}

impl From<TextContent> for AssistantContent {
    fn from(text: TextContent) -> Self {
        AssistantContent::Text(text)
    }
}
