//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion to provider settings happens
//! in [`crate::providers`].

mod chat;
mod logging;
mod output;
mod providers;
mod repl;

pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use providers::{
    FileAzureConfig, FileGithubCopilotConfig, FileOpenAiConfig, FileProvidersConfig,
};
pub use repl::FileReplConfig;

use serde::{Deserialize, Serialize};
use std::fmt;
use termchat_domain::is_valid_azure_endpoint;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Vendor credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Chat palette settings
    pub chat: FileChatConfig,
    /// Diagnostic and conversation logs
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found by [`FileConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the named provider unusable; warnings only mean a setting
    /// will be ignored.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Err(e) = self.providers.default_kind() {
            issues.push(ConfigIssue::error(
                "providers.default",
                format!("{} (expected azure, openai or github-copilot)", e),
            ));
        }

        if self.providers.request_timeout_secs == Some(0) {
            issues.push(ConfigIssue::warning(
                "providers.request_timeout_secs",
                "0 disables the timeout; remove the key instead",
            ));
        }

        if let Some(endpoint) = &self.providers.azure.endpoint
            && !is_valid_azure_endpoint(endpoint)
        {
            issues.push(ConfigIssue::error(
                "providers.azure.endpoint",
                format!("'{}' is not an https://<resource>.openai.azure.com URL", endpoint),
            ));
        }

        if self
            .chat
            .system_prompt
            .as_ref()
            .is_some_and(|p| p.trim().is_empty())
        {
            issues.push(ConfigIssue::warning(
                "chat.system_prompt",
                "empty prompt ignored, using the built-in one",
            ));
        }

        issues
    }
}
