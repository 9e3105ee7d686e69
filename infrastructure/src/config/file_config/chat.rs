//! Chat palette configuration from TOML (`[chat]` section)

use serde::{Deserialize, Serialize};
use termchat_application::ChatConfig;

/// Raw chat configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Replaces the built-in shell-assistant system prompt
    pub system_prompt: Option<String>,
    /// Attribution for responses that carry none
    pub profile_name: Option<String>,
    /// Shell assumed when `--shell` is not given
    pub shell: Option<String>,
}

impl FileChatConfig {
    pub fn to_chat_config(&self) -> ChatConfig {
        let mut config = ChatConfig::default();
        if let Some(prompt) = self.system_prompt.as_ref().filter(|p| !p.trim().is_empty()) {
            config = config.with_system_prompt(prompt.clone());
        }
        if let Some(name) = self.profile_name.as_ref().filter(|n| !n.trim().is_empty()) {
            config = config.with_profile_name(name.clone());
        }
        config
    }
}
