use crate::config::MAXIMUM_AUTO_INVOKE_ATTEMPTS;
use crate::contents::{ChatHistory, ChatMessage, FunctionCallContent, FunctionResultContent};
use crate::error::KernelError;
use crate::function_choice::{
    FunctionChoiceBehavior, FunctionChoiceConfiguration, FunctionChoiceContext,
};
use crate::functions::KernelArguments;
use crate::kernel::Kernel;

/// Resolves the per-round function choice configuration and executes the function calls
/// returned by the model.
#[derive(Debug, Clone, Copy)]
pub struct FunctionCallsProcessor {
    max_auto_invoke_attempts: usize,
}

impl Default for FunctionCallsProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionCallsProcessor {
    /// Creates a processor that stops auto-invoking at round trip 128.
    pub fn new() -> Self {
        Self {
            max_auto_invoke_attempts: MAXIMUM_AUTO_INVOKE_ATTEMPTS,
        }
    }

    /// Sets the round trip index from which auto-invocation is disabled.
    pub fn with_max_auto_invoke_attempts(mut self, max_auto_invoke_attempts: usize) -> Self {
        self.max_auto_invoke_attempts = max_auto_invoke_attempts;
        self
    }

    /// Returns the round trip index from which auto-invocation is disabled.
    pub fn max_auto_invoke_attempts(&self) -> usize {
        self.max_auto_invoke_attempts
    }

    /// Resolves the configuration for the round trip `request_index` (1-based).
    ///
    /// Returns `None` without a behavior. Auto-invocation is turned off when there is no
    /// kernel to invoke functions on, and from the attempt ceiling onwards.
    pub fn get_configuration(
        &self,
        behavior: Option<&dyn FunctionChoiceBehavior>,
        request_index: usize,
        chat_history: &ChatHistory,
        kernel: Option<&Kernel>,
    ) -> Result<Option<FunctionChoiceConfiguration>, KernelError> {
        let Some(behavior) = behavior else {
            return Ok(None);
        };

        let context = FunctionChoiceContext {
            request_index,
            chat_history,
            kernel,
        };
        let mut config = behavior.configure(context)?;
        config.auto_invoke = config.auto_invoke && kernel.is_some();
        if config.auto_invoke && request_index >= self.max_auto_invoke_attempts {
            tracing::warn!(
                target: "semkern",
                "Maximum auto-invoke attempts reached: {}/{}",
                request_index,
                self.max_auto_invoke_attempts
            );
            config.auto_invoke = false;
        }
        Ok(Some(config))
    }

    /// Invokes the function calls in `message` and appends the message and one tool
    /// message per call to the history.
    ///
    /// Calls are processed sequentially in the order the model issued them. A call to a
    /// function that was not advertised, cannot be found or fails produces an error text
    /// as its result; only a missing kernel is an error.
    pub async fn process_function_calls<F>(
        &self,
        message: ChatMessage,
        chat_history: &mut ChatHistory,
        is_advertised: F,
        kernel: Option<&Kernel>,
    ) -> Result<(), KernelError>
    where
        F: Fn(&FunctionCallContent) -> bool + Send + Sync,
    {
        let calls = message
            .function_calls()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        if calls.is_empty() {
            return Ok(());
        }
        let kernel = kernel.ok_or(KernelError::KernelRequired)?;

        chat_history.push(message);
        for call in calls {
            let result = self.invoke_function_call(&call, &is_advertised, kernel).await;
            chat_history.push(ChatMessage::tool(FunctionResultContent::for_call(&call, result)));
        }
        Ok(())
    }

    async fn invoke_function_call<F>(
        &self,
        call: &FunctionCallContent,
        is_advertised: &F,
        kernel: &Kernel,
    ) -> String
    where
        F: Fn(&FunctionCallContent) -> bool + Send + Sync,
    {
        let function_name = &call.function_name;
        if !is_advertised(call) {
            tracing::warn!(target: "semkern", "Function `{function_name}` was not advertised");
            return format!(
                "Function call request for a function {function_name} that was not defined."
            );
        }

        let Some(function) = kernel
            .plugins()
            .get_function(function_name, call.plugin_name.as_deref())
        else {
            tracing::warn!(target: "semkern", "Function `{function_name}` is not registered");
            return format!(
                "The specified function {function_name} is not available in the kernel."
            );
        };

        tracing::info!(
            target: "semkern",
            "Calling function {function_name} with args:\n{}",
            serde_json::to_string_pretty(&call.arguments).unwrap_or_default()
        );
        let arguments = KernelArguments::from(call.arguments.clone());
        match kernel.invoke(&function, arguments).await {
            Ok(result) => result.value.to_result_text(),
            Err(err) => {
                tracing::warn!(target: "semkern", "Function `{function_name}` failed: {err}");
                format!("Error while invoking function: {err}")
            }
        }
    }
}
