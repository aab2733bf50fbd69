//! AI services and how a request is routed to one of them.

mod ai_service;
mod chat_completion;
mod provider;
mod settings;

pub use ai_service::{AiService, ServiceType};
pub use chat_completion::{ChatCompletionRequest, ChatCompletionService};
pub use provider::{ServiceProvider, ServiceSelection};
pub use settings::{DEFAULT_SERVICE_ID, PromptExecutionSettings};
