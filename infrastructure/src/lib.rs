//! Infrastructure layer for terminal-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the vendor LLM providers, the JSONL
//! conversation logger, token persistence and configuration file loading.

pub mod auth;
pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use auth::{TokenStore, TokenStoreError};
pub use config::{
    ConfigIssue, ConfigLoader, FileChatConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileProvidersConfig, FileReplConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    azure::AzureOpenAiProvider, build_provider, github_copilot::GithubCopilotProvider,
    github_copilot_settings, openai::OpenAiProvider,
};
