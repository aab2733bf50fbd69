use super::message::ChatMessage;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered history of chat messages.
///
/// During one orchestration run the history only grows: the loop borrows it
/// mutably and appends assistant and tool turns.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history starting with a system message.
    pub fn with_system_message(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(text)],
        }
    }

    /// Appends a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Appends a user message.
    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::user(text));
    }

    /// Appends a system message.
    pub fn add_system_message(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::system(text));
    }

    /// Appends an assistant message.
    pub fn add_assistant_message(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::assistant(text));
    }

    /// Returns the messages.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the last message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Returns an iterator over the messages.
    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consumes the history and returns the messages.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

impl From<Vec<ChatMessage>> for ChatHistory {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

impl Index<usize> for ChatHistory {
    type Output = ChatMessage;

    fn index(&self, index: usize) -> &Self::Output {
        &self.messages[index]
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl Extend<ChatMessage> for ChatHistory {
    fn extend<T: IntoIterator<Item = ChatMessage>>(&mut self, iter: T) {
        self.messages.extend(iter);
    }
}
