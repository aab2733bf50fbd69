//! Error types shared across the kernel.
//!
//! Configuration mistakes surface as [`KernelError`] and are returned to the caller.
//! Failures of a single function body are [`FunctionError`]s; during auto-invocation
//! they are folded into the chat history instead of being raised.

use crate::prompt_template::TemplateError;
use crate::services::ServiceType;
use thiserror::Error;

/// Errors raised while configuring or driving the kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A plugin was registered without any functions.
    #[error("plugin `{0}` does not contain any functions")]
    EmptyPlugin(String),

    /// A plugin with the same name has already been registered.
    #[error("plugin `{0}` has already been added")]
    DuplicatePlugin(String),

    /// Two functions in one plugin share a name.
    #[error("function `{function}` has already been added to plugin `{plugin}`")]
    DuplicateFunction {
        /// Name of the plugin being registered.
        plugin: String,
        /// Name of the duplicated function.
        function: String,
    },

    /// A service with the same id has already been registered.
    #[error("service id `{0}` is already registered")]
    DuplicateService(String),

    /// Two execution settings target the same service id.
    #[error("execution settings for service id `{0}` already exist")]
    DuplicateExecutionSettings(String),

    /// A function named explicitly for auto-invocation is not in the kernel.
    #[error("the specified function {0} is not available in the kernel")]
    FunctionNotAvailable(String),

    /// A fully-qualified function name could not be parsed.
    #[error("invalid function name: {0}")]
    InvalidFunctionName(String),

    /// Function calls were to be auto-invoked without a kernel.
    #[error("auto-invocation is not supported when no kernel is provided")]
    KernelRequired,

    /// No registered service satisfies the request.
    #[error("no {0} service is registered that satisfies the request")]
    ServiceNotFound(ServiceType),

    /// The completion backend failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// A function invoked directly through the kernel failed.
    #[error(transparent)]
    Function(#[from] FunctionError),

    /// A prompt template could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The TOML configuration is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a function body.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The arguments do not match what the function expects.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The function ran and failed.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Arguments or results could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The function called back into the kernel and that call failed.
    #[error(transparent)]
    Kernel(Box<KernelError>),

    /// Any other error produced by user code.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl FunctionError {
    /// Creates an [`FunctionError::ExecutionFailed`] from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        FunctionError::ExecutionFailed(message.into())
    }
}

impl From<KernelError> for FunctionError {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::Function(err) => err,
            err => FunctionError::Kernel(Box::new(err)),
        }
    }
}

impl From<TemplateError> for FunctionError {
    fn from(err: TemplateError) -> Self {
        FunctionError::Kernel(Box::new(KernelError::Template(err)))
    }
}

/// Errors raised by a chat completion backend.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Json error (e.g.: serialization, deserialization)
    #[error("JsonError: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error building or sending the completion request
    #[error("RequestError: {0}")]
    RequestError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Error parsing the completion response
    #[error("ResponseError: {0}")]
    ResponseError(String),

    /// Error returned by the completion model provider
    #[error("ProviderError: {0}")]
    ProviderError(String),
}
