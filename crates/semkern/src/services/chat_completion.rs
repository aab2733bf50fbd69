use super::{AiService, PromptExecutionSettings};
use crate::contents::{ChatHistory, ChatMessage};
use crate::error::CompletionError;
use crate::function_choice::FunctionChoice;
use crate::functions::FunctionMetadata;

/// One round trip's request to a chat completion backend.
#[derive(Debug, Clone, Copy)]
pub struct ChatCompletionRequest<'a> {
    /// The conversation so far.
    pub chat_history: &'a ChatHistory,
    /// Functions to advertise to the model.
    pub functions: &'a [FunctionMetadata],
    /// How the model may use the advertised functions, if function calling is configured.
    pub function_choice: Option<FunctionChoice>,
    /// The settings selected for this request.
    pub settings: Option<&'a PromptExecutionSettings>,
    /// 1-based index of the round trip within the current run.
    pub request_index: usize,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Creates a request that advertises no functions.
    pub fn new(chat_history: &'a ChatHistory) -> Self {
        Self {
            chat_history,
            functions: &[],
            function_choice: None,
            settings: None,
            request_index: 1,
        }
    }
}

/// A backend that answers a chat history with an assistant message.
///
/// Implementations translate the advertised functions into their wire schema and return
/// the function calls the model made as [`FunctionCallContent`](crate::FunctionCallContent)
/// items of the returned message.
#[async_trait::async_trait]
pub trait ChatCompletionService: AiService {
    /// Performs one round trip.
    async fn complete(
        &self,
        request: ChatCompletionRequest<'_>,
    ) -> Result<ChatMessage, CompletionError>;
}
