//! History and context bookkeeping shared by every vendor adapter.

use serde_json::Value;
use termchat_domain::{ConversationHistory, TerminalContext, engineer_prompt};

/// The vendor-independent half of a provider.
#[derive(Debug, Default)]
pub struct ProviderCore {
    history: ConversationHistory,
    context: Option<TerminalContext>,
}

impl ProviderCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn set_system_prompt(&mut self, system_prompt: &str) {
        self.history.push_system(system_prompt);
    }

    pub fn set_context(&mut self, context: TerminalContext) {
        self.context = Some(context);
    }

    pub fn clear_message_history(&mut self) {
        self.history.clear();
    }

    /// Record the user's turn, with the active shell appended.
    pub fn push_user(&mut self, prompt: &str) {
        let engineered = engineer_prompt(prompt, self.context.as_ref());
        self.history.push_user(engineered);
    }

    /// Record the reply, or the error text shown in its place.
    pub fn push_assistant(&mut self, reply: &str) {
        self.history.push_assistant(reply);
    }

    /// The `messages` array for the next request.
    pub fn messages(&self) -> Value {
        self.history.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termchat_domain::Role;

    #[test]
    fn test_user_turn_carries_shell() {
        let mut core = ProviderCore::new();
        core.set_context(TerminalContext::new("pwsh.exe"));
        core.push_user("list files");

        let messages = core.messages();
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(
            messages[0]["content"],
            "list files. The shell I am running is pwsh.exe"
        );
    }

    #[test]
    fn test_reset_then_prime() {
        let mut core = ProviderCore::new();
        core.set_system_prompt("old");
        core.push_user("q");
        core.push_assistant("a");

        core.clear_message_history();
        core.set_system_prompt("new");

        assert_eq!(core.history().len(), 1);
        assert_eq!(core.history().count_role(Role::System), 1);
        assert_eq!(core.messages()[0]["content"], "new");
    }
}
