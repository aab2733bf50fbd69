use super::FunctionCallsProcessor;
use crate::contents::{ChatHistory, ChatMessage};
use crate::error::KernelError;
use crate::functions::FunctionMetadata;
use crate::kernel::Kernel;
use crate::services::{ChatCompletionRequest, ChatCompletionService, PromptExecutionSettings};

/// Drives round trips with a chat completion service until the model answers without
/// function calls that should be auto-invoked.
///
/// Each round trip resolves the function choice behavior of the settings, sends the
/// history and the advertised functions to the service, and either returns the response
/// or invokes the requested functions and loops. The attempt ceiling of the
/// [`FunctionCallsProcessor`] guarantees termination.
pub struct FunctionCallingLoop<'a> {
    service: &'a dyn ChatCompletionService,
    kernel: Option<&'a Kernel>,
    settings: Option<&'a PromptExecutionSettings>,
    processor: Option<FunctionCallsProcessor>,
}

impl<'a> FunctionCallingLoop<'a> {
    /// Creates a loop without a kernel or settings.
    pub fn new(service: &'a dyn ChatCompletionService) -> Self {
        Self {
            service,
            kernel: None,
            settings: None,
            processor: None,
        }
    }

    /// Sets the kernel whose functions are invoked.
    ///
    /// Unless a processor is set, the attempt ceiling comes from the kernel config.
    pub fn with_kernel(mut self, kernel: &'a Kernel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    /// Sets the execution settings sent with each request.
    pub fn with_settings(mut self, settings: Option<&'a PromptExecutionSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the processor, taking precedence over the kernel's attempt ceiling.
    pub fn with_processor(mut self, processor: FunctionCallsProcessor) -> Self {
        self.processor = Some(processor);
        self
    }

    fn processor(&self) -> FunctionCallsProcessor {
        self.processor.unwrap_or_else(|| match self.kernel {
            Some(kernel) => FunctionCallsProcessor::new()
                .with_max_auto_invoke_attempts(kernel.config().max_auto_invoke_attempts),
            None => FunctionCallsProcessor::new(),
        })
    }

    /// Runs round trips until a terminal response, which is appended to the history and
    /// returned.
    pub async fn run(&self, chat_history: &mut ChatHistory) -> Result<ChatMessage, KernelError> {
        let behavior = self
            .settings
            .and_then(|settings| settings.function_choice_behavior.as_deref());
        let processor = self.processor();
        let mut request_index = 1;
        loop {
            let config = processor.get_configuration(
                behavior,
                request_index,
                chat_history,
                self.kernel,
            )?;
            let functions = config
                .iter()
                .flat_map(|config| config.functions.iter())
                .map(|function| function.metadata().clone())
                .collect::<Vec<FunctionMetadata>>();

            tracing::debug!(
                target: "semkern",
                service_id = self.service.service_id(),
                request_index,
                functions = functions.len(),
                "sending chat completion request"
            );
            let request = ChatCompletionRequest {
                chat_history: &*chat_history,
                functions: &functions,
                function_choice: config.as_ref().map(|config| config.choice),
                settings: self.settings,
                request_index,
            };
            let response = self.service.complete(request).await?;

            let config = match config {
                Some(config) if config.auto_invoke && response.has_function_calls() => config,
                _ => {
                    chat_history.push(response.clone());
                    return Ok(response);
                }
            };

            if request_index > 1 {
                tracing::info!(target: "semkern", "Current request index: {request_index}");
            }
            processor
                .process_function_calls(
                    response,
                    chat_history,
                    |call| config.is_advertised(&call.function_name, call.plugin_name.as_deref()),
                    self.kernel,
                )
                .await?;
            request_index += 1;
        }
    }
}

impl std::fmt::Debug for FunctionCallingLoop<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCallingLoop")
            .field("service_id", &self.service.service_id())
            .field("settings", &self.settings)
            .field("processor", &self.processor())
            .finish_non_exhaustive()
    }
}
