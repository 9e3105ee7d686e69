//! Application-level configuration.
//!
//! Controls how the chat palette primes and labels a conversation.

use termchat_domain::DEFAULT_SYSTEM_PROMPT;

/// Chat palette behavior configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Sent as the first message after every reset.
    pub system_prompt: String,
    /// Attribution for responses whose provider gives none (the terminal
    /// profile name in a real host).
    pub profile_name: String,
    /// Include prompt and response text in conversation log events.
    pub log_message_text: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            profile_name: "Terminal Chat".to_string(),
            log_message_text: false,
        }
    }
}

impl ChatConfig {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = name.into();
        self
    }

    pub fn with_message_text_logging(mut self, enabled: bool) -> Self {
        self.log_message_text = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_shell_assistant_prompt() {
        let config = ChatConfig::default();
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.profile_name, "Terminal Chat");
        assert!(!config.log_message_text);
    }

    #[test]
    fn test_builders_override() {
        let config = ChatConfig::default()
            .with_system_prompt("be terse")
            .with_profile_name("PowerShell")
            .with_message_text_logging(true);
        assert_eq!(config.system_prompt, "be terse");
        assert_eq!(config.profile_name, "PowerShell");
        assert!(config.log_message_text);
    }
}
