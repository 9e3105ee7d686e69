//! Conversation history held by a provider.
//!
//! The history is the `messages` array sent with every chat-completion
//! request. It only ever grows by appending; the sole other mutation is a
//! full [`clear`](ConversationHistory::clear).

use super::entities::{Message, Role};
use serde::Serialize;

/// Ordered, append-only list of role-tagged messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(Message::system(content));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of entries with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// The history as a JSON array, ready to embed as a request's `messages`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.messages
                .iter()
                .map(|m| serde_json::json!({"role": m.role.as_str(), "content": m.content}))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_then_system_prompt_leaves_single_entry() {
        let mut history = ConversationHistory::new();
        history.push_user("old question");
        history.push_assistant("old answer");

        history.clear();
        history.push_system("be helpful");

        assert_eq!(history.messages(), &[Message::system("be helpful")]);
    }

    #[test]
    fn test_to_json_matches_wire_format() {
        let mut history = ConversationHistory::new();
        history.push_system("sys");
        history.push_user("how do I list files?");

        assert_eq!(
            history.to_json(),
            serde_json::json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "how do I list files?"}
            ])
        );
        assert_eq!(serde_json::to_value(&history).unwrap(), history.to_json());
    }

    #[test]
    fn test_count_role() {
        let mut history = ConversationHistory::new();
        history.push_user("a");
        history.push_assistant("b");
        history.push_user("c");
        assert_eq!(history.count_role(Role::User), 2);
        assert_eq!(history.count_role(Role::System), 0);
    }
}
