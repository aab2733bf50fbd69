//! Kernel functions backed by Rust closures.

use super::arguments::KernelArguments;
use super::function::{FunctionMetadata, FunctionResult, KernelFunction};
use crate::error::FunctionError;
use crate::kernel::Kernel;
use crate::{JsonValue, Map};
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;

type NativeHandler =
    Box<dyn Fn(Map) -> BoxFuture<'static, Result<JsonValue, FunctionError>> + Send + Sync>;

/// A function whose body is a Rust closure over the JSON arguments object.
pub struct NativeFunction {
    metadata: FunctionMetadata,
    handler: NativeHandler,
}

impl NativeFunction {
    /// Wraps an async closure.
    pub fn new<F, Fut>(metadata: FunctionMetadata, function: F) -> Self
    where
        F: Fn(Map) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonValue, FunctionError>> + Send + 'static,
    {
        Self {
            metadata,
            handler: Box::new(move |arguments| function(arguments).boxed()),
        }
    }
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl KernelFunction for NativeFunction {
    fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    async fn invoke_core(
        &self,
        _kernel: &Kernel,
        arguments: &KernelArguments,
    ) -> Result<FunctionResult, FunctionError> {
        let value = (self.handler)(arguments.arguments().clone()).await?;
        Ok(FunctionResult::new(value))
    }
}

/// Helper functions for creating native functions
pub mod helpers {
    use super::*;
    use schemars::{JsonSchema, schema_for};
    use serde::{Serialize, de::DeserializeOwned};
    use serde_json::json;

    /// Create a function that takes no parameters
    pub fn no_param<F>(name: &str, description: &str, function: F) -> NativeFunction
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let metadata = FunctionMetadata::new(name, description).with_parameters(json!({
            "type": "object",
            "properties": {},
            "required": []
        }));
        NativeFunction::new(metadata, move |_| future::ready(Ok(JsonValue::String(function()))))
    }

    /// Create a function that takes JSON arguments and returns JSON
    pub fn json_function<F>(
        name: &str,
        description: &str,
        parameters_schema: JsonValue,
        function: F,
    ) -> NativeFunction
    where
        F: Fn(&Map) -> Result<JsonValue, FunctionError> + Send + Sync + 'static,
    {
        let metadata = FunctionMetadata::new(name, description).with_parameters(parameters_schema);
        NativeFunction::new(metadata, move |arguments| future::ready(function(&arguments)))
    }

    /// Create a function from an async closure over the JSON arguments
    pub fn async_function<F, Fut>(
        name: &str,
        description: &str,
        parameters_schema: JsonValue,
        function: F,
    ) -> NativeFunction
    where
        F: Fn(Map) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonValue, FunctionError>> + Send + 'static,
    {
        let metadata = FunctionMetadata::new(name, description).with_parameters(parameters_schema);
        NativeFunction::new(metadata, function)
    }

    /// Create a function with typed arguments. The parameter schema is derived from `A`.
    pub fn typed_function<A, O, F>(name: &str, description: &str, function: F) -> NativeFunction
    where
        A: DeserializeOwned + JsonSchema + 'static,
        O: Serialize + 'static,
        F: Fn(A) -> Result<O, FunctionError> + Send + Sync + 'static,
    {
        let metadata =
            FunctionMetadata::new(name, description).with_parameters(json!(schema_for!(A)));
        NativeFunction::new(metadata, move |arguments| {
            let result = serde_json::from_value::<A>(JsonValue::Object(arguments))
                .map_err(|e| FunctionError::InvalidArguments(e.to_string()))
                .and_then(|args| function(args))
                .and_then(|output| Ok(serde_json::to_value(output)?));
            future::ready(result)
        })
    }
}
