//! Chat messages and the content items they carry.
//!
//! A [`ChatMessage`] stores its items in a [`MessageItems`] variant per role, so an
//! illegal combination such as a function call inside a user turn cannot be built.

mod history;
mod items;
mod message;

pub use history::ChatHistory;
pub use items::{AssistantContent, FunctionCallContent, FunctionResultContent, TextContent};
pub use message::{AuthorRole, ChatMessage, MessageItems};
