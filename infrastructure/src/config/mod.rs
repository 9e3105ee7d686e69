//! Configuration file loading for terminal-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `TERMINAL_CHAT_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./terminal-chat.toml` or `./.terminal-chat.toml`
//! 4. Global: `$XDG_CONFIG_HOME/terminal-chat/config.toml`
//!    (fallback `~/.config/terminal-chat/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileAzureConfig, FileChatConfig, FileConfig, FileGithubCopilotConfig,
    FileLoggingConfig, FileOpenAiConfig, FileOutputConfig, FileProvidersConfig, FileReplConfig,
    Severity,
};
pub use loader::ConfigLoader;
