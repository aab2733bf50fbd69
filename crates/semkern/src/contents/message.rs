use super::items::{AssistantContent, FunctionCallContent, FunctionResultContent, TextContent};
use crate::Map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the author of a chat message.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    /// Sets the behavior of the conversation.
    System,
    /// A human turn.
    User,
    /// A model turn.
    Assistant,
    /// Function results.
    Tool,
}

impl fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            AuthorRole::System => "system",
            AuthorRole::User => "user",
            AuthorRole::Assistant => "assistant",
            AuthorRole::Tool => "tool",
        };
        f.write_str(role)
    }
}

/// The items of a message. The variant is the role, so a tool message can only
/// carry function results and a user message can only carry text.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "role", content = "items", rename_all = "lowercase")]
pub enum MessageItems {
    /// Items of a system message.
    System(Vec<TextContent>),
    /// Items of a user message.
    User(Vec<TextContent>),
    /// Items of an assistant message.
    Assistant(Vec<AssistantContent>),
    /// Items of a tool message.
    Tool(Vec<FunctionResultContent>),
}

/// One turn in a conversation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatMessage {
    /// The role and the items it allows.
    pub items: MessageItems,
    /// Optional name of the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Open key/value metadata.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map,
    /// The model that produced this message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl ChatMessage {
    /// Creates a message from its items.
    pub fn new(items: MessageItems) -> Self {
        Self {
            items,
            author_name: None,
            metadata: Map::new(),
            model_id: None,
        }
    }

    /// Helper constructor to make creating system messages easier.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageItems::System(vec![text.into().into()]))
    }

    /// Helper constructor to make creating user messages easier.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageItems::User(vec![text.into().into()]))
    }

    /// Helper constructor to make creating assistant messages easier.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageItems::Assistant(vec![AssistantContent::text(text)]))
    }

    /// Creates an assistant message with mixed text and function-call items.
    pub fn assistant_with_items(items: Vec<AssistantContent>) -> Self {
        Self::new(MessageItems::Assistant(items))
    }

    /// Creates a tool message carrying a single function result.
    pub fn tool(result: FunctionResultContent) -> Self {
        Self::new(MessageItems::Tool(vec![result]))
    }

    /// Sets the author name.
    pub fn with_author_name(mut self, author_name: impl Into<String>) -> Self {
        self.author_name = Some(author_name.into());
        self
    }

    /// Sets the model identifier.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Inserts a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::JsonValue>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the role of the author.
    pub fn role(&self) -> AuthorRole {
        match &self.items {
            MessageItems::System(_) => AuthorRole::System,
            MessageItems::User(_) => AuthorRole::User,
            MessageItems::Assistant(_) => AuthorRole::Assistant,
            MessageItems::Tool(_) => AuthorRole::Tool,
        }
    }

    /// Returns the text of the first item when that item is text.
    pub fn content(&self) -> Option<&str> {
        match &self.items {
            MessageItems::System(items) | MessageItems::User(items) => {
                items.first().map(|item| item.text.as_str())
            }
            MessageItems::Assistant(items) => match items.first() {
                Some(AssistantContent::Text(item)) => Some(item.text.as_str()),
                _ => None,
            },
            MessageItems::Tool(_) => None,
        }
    }

    /// Returns the function-call requests in the order the model issued them.
    pub fn function_calls(&self) -> Vec<&FunctionCallContent> {
        match &self.items {
            MessageItems::Assistant(items) => items
                .iter()
                .filter_map(|item| match item {
                    AssistantContent::FunctionCall(call) => Some(call),
                    AssistantContent::Text(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `true` if the message requests at least one function call.
    pub fn has_function_calls(&self) -> bool {
        matches!(
            &self.items,
            MessageItems::Assistant(items)
                if items.iter().any(|item| matches!(item, AssistantContent::FunctionCall(_)))
        )
    }

    /// Returns the function results carried by a tool message.
    pub fn function_results(&self) -> &[FunctionResultContent] {
        match &self.items {
            MessageItems::Tool(results) => results,
            _ => &[],
        }
    }
}

impl From<String> for ChatMessage {
    fn from(text: String) -> Self {
        ChatMessage::user(text)
    }
}

impl From<&str> for ChatMessage {
    fn from(text: &str) -> Self {
        ChatMessage::user(text)
    }
}

impl From<FunctionResultContent> for ChatMessage {
    fn from(result: FunctionResultContent) -> Self {
        ChatMessage::tool(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_follows_items() {
        assert_eq!(ChatMessage::system("s").role(), AuthorRole::System);
        assert_eq!(ChatMessage::user("u").role(), AuthorRole::User);
        assert_eq!(ChatMessage::assistant("a").role(), AuthorRole::Assistant);

        let call = FunctionCallContent::new("1", "f", Map::new()).with_plugin_name("p");
        let result = FunctionResultContent::for_call(&call, "ok");
        assert_eq!(result.plugin_name.as_deref(), Some("p"));
        assert_eq!(ChatMessage::tool(result).role(), AuthorRole::Tool);
    }

    #[test]
    fn test_content_is_first_text_item() {
        let message = ChatMessage::assistant_with_items(vec![
            AssistantContent::function_call("1", None, "f", Map::new()),
            AssistantContent::text("later"),
        ]);
        assert_eq!(message.content(), None);
        assert_eq!(ChatMessage::user("hello").content(), Some("hello"));
    }

    #[test]
    fn test_function_calls_keep_order() {
        let message = ChatMessage::assistant_with_items(vec![
            AssistantContent::text("calling"),
            AssistantContent::function_call("a", Some("p"), "first", Map::new()),
            AssistantContent::function_call("b", None, "second", Map::new()),
        ]);
        let ids = message
            .function_calls()
            .iter()
            .map(|call| call.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b"]);
        assert!(message.has_function_calls());
        assert!(!ChatMessage::assistant("plain").has_function_calls());
    }

    #[test]
    fn test_serde_shape() {
        let message = ChatMessage::user("hi")
            .with_author_name("ann")
            .with_metadata("channel", "web");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "items": { "role": "user", "items": [{ "text": "hi" }] },
                "author_name": "ann",
                "metadata": { "channel": "web" }
            })
        );
        let back: ChatMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, message);
    }
}
