//! Conversation messages and the append-only history.
//!
//! `MessageHistory` is the single shared state every other component reads:
//! edges evaluate their guards against it, nodes produce default responses
//! from it, and the session appends to it. Messages are never removed or
//! reordered once appended.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::llm::PromptContext;

/// Speaker of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(s)
    }
}

/// One conversation turn. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Creates a USER message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an ASSISTANT message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a SYSTEM message. Recorded for model context, never displayed.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.content)
    }
}

/// Ordered, append-only log of the conversation, owned by one session.
///
/// **Interaction**: the session is the only writer; nodes and edges receive
/// `&MessageHistory` and return messages for the session to append.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MessageHistory {
    messages: Vec<Message>,
}

impl MessageHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. There is no remove: the history only grows.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a USER message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Appends an ASSISTANT message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    /// Appends a SYSTEM message.
    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(Message::system(content));
    }

    /// All messages, in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages spoken by `role`, preserving order.
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.role == role)
    }

    /// The most recent message spoken by `role`.
    pub fn last_of(&self, role: Role) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == role)
    }

    /// Full transcript, one `role: content` line per message.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.messages {
            out.push_str(&format!("{}\n", m));
        }
        out
    }

    /// Assembles the context for one prediction call: everything before the
    /// final turn as `history`, the latest USER message as `input`.
    pub fn prompt_context(&self, instructions: impl Into<String>) -> PromptContext {
        let history = self
            .messages
            .iter()
            .take(self.messages.len().saturating_sub(1))
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let input = self
            .last_of(Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        PromptContext {
            instructions: instructions.into(),
            history,
            input,
        }
    }
}
