#![doc = include_str!("../README.md")]

pub mod config;
pub mod contents;
pub mod error;
pub mod function_calling;
pub mod function_choice;
pub mod functions;
pub mod kernel;
pub mod prompt_template;
pub mod services;

pub use config::KernelConfig;
pub use contents::{
    AssistantContent, AuthorRole, ChatHistory, ChatMessage, FunctionCallContent,
    FunctionResultContent, MessageItems, TextContent,
};
pub use error::{CompletionError, FunctionError, KernelError};
pub use function_calling::{FunctionCallingLoop, FunctionCallsProcessor};
pub use function_choice::{
    AutoFunctionChoiceBehavior, FunctionChoice, FunctionChoiceBehavior,
    FunctionChoiceConfiguration, FunctionChoiceContext, NoneFunctionChoiceBehavior,
};
pub use functions::{
    FunctionInvocationContext, FunctionInvocationFilter, FunctionMetadata, FunctionName,
    FunctionResult, FunctionValue, KernelArguments, KernelFunction, KernelFunctionFromPrompt,
    KernelPlugin, KernelPlugins, NativeFunction, Next, RegisteredFunction,
};
pub use kernel::{Kernel, KernelBuilder};
pub use prompt_template::{PromptTemplate, TemplateFormat};
pub use services::{
    AiService, ChatCompletionRequest, ChatCompletionService, PromptExecutionSettings,
    ServiceProvider, ServiceSelection, ServiceType,
};

#[doc(no_inline)]
pub use serde_json::json;

/// A JSON value.
pub type JsonValue = serde_json::Value;

/// A JSON key-value type.
pub type Map = serde_json::Map<String, JsonValue>;
