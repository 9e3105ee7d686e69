//! The displayed transcript: one group per chat turn.

use super::entities::GroupedChatMessages;

/// Label written before a user turn in an exported transcript.
pub const USER_LABEL: &str = "User";
/// Label written before a response turn in an exported transcript.
pub const ASSISTANT_LABEL: &str = "Assistant";

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    groups: Vec<GroupedChatMessages>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, group: GroupedChatMessages) {
        self.groups.push(group);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn groups(&self) -> &[GroupedChatMessages] {
        &self.groups
    }

    pub fn last(&self) -> Option<&GroupedChatMessages> {
        self.groups.last()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Plain-text export: a `User:` / `Assistant:` header line per turn,
    /// followed by each fragment on its own line.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            out.push_str(if group.is_query {
                USER_LABEL
            } else {
                ASSISTANT_LABEL
            });
            out.push_str(":\n");
            for message in &group.messages {
                out.push_str(message.content());
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::entities::ChatMessage;

    #[test]
    fn test_export_labels_each_turn() {
        let mut transcript = Transcript::new();
        transcript.append(GroupedChatMessages::new(
            "09:00",
            true,
            vec![ChatMessage::query("undo last commit")],
            "octocat",
        ));
        transcript.append(GroupedChatMessages::new(
            "09:00",
            false,
            vec![
                ChatMessage::text("Run:"),
                ChatMessage::code("git reset --soft HEAD~1"),
            ],
            "GitHub Copilot",
        ));

        assert_eq!(
            transcript.export_text(),
            "User:\nundo last commit\nAssistant:\nRun:\ngit reset --soft HEAD~1\n"
        );
    }

    #[test]
    fn test_empty_transcript_exports_nothing() {
        let transcript = Transcript::new();
        assert!(transcript.export_text().is_empty());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn test_clear_drops_all_groups() {
        let mut transcript = Transcript::new();
        transcript.append(GroupedChatMessages::new("1", true, vec![], ""));
        assert_eq!(transcript.len(), 1);
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
