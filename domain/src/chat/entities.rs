//! Chat transcript entities

use serde::{Deserialize, Serialize};

/// One displayed fragment of a chat turn.
///
/// A user query is a single fragment; a response is split at fenced code
/// block boundaries so each command can be copied or run on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    content: String,
    is_query: bool,
    is_code: bool,
}

impl ChatMessage {
    /// The user's side of a turn. Never segmented.
    pub fn query(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_query: true,
            is_code: false,
        }
    }

    /// Plain text from a response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_query: false,
            is_code: false,
        }
    }

    /// The body of a fenced code block from a response.
    pub fn code(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_query: false,
            is_code: true,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_query(&self) -> bool {
        self.is_query
    }

    pub fn is_code(&self) -> bool {
        self.is_code
    }
}

/// All fragments of one turn, with the metadata shown above them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedChatMessages {
    /// Local time the turn was added, `HH:MM`.
    pub time: String,
    pub is_query: bool,
    pub messages: Vec<ChatMessage>,
    /// Who sent it (the signed-in user, the provider, or the profile name).
    pub attribution: String,
    /// Provider badge shown next to responses; empty when there is none.
    pub badge_icon_path: String,
}

impl GroupedChatMessages {
    pub fn new(
        time: impl Into<String>,
        is_query: bool,
        messages: Vec<ChatMessage>,
        attribution: impl Into<String>,
    ) -> Self {
        Self {
            time: time.into(),
            is_query,
            messages,
            attribution: attribution.into(),
            badge_icon_path: String::new(),
        }
    }

    pub fn with_badge(mut self, badge_icon_path: impl Into<String>) -> Self {
        self.badge_icon_path = badge_icon_path.into();
        self
    }

    /// Code fragments of this turn, in order.
    pub fn code_blocks(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.is_code())
    }
}
