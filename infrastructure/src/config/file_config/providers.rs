//! Provider configuration from TOML (`[providers]` section)

use crate::providers::azure::{DEFAULT_ACCEPTED_MODEL, DEFAULT_ACCEPTED_SEVERITY};
use crate::providers::github_copilot::{
    DEFAULT_AUTHORIZE_ENDPOINT, DEFAULT_CHAT_ENDPOINT, DEFAULT_GRAPHQL_ENDPOINT,
    DEFAULT_INTEGRATION_ID, DEFAULT_TOKEN_ENDPOINT, DEFAULT_USER_AGENT,
};
use crate::providers::openai;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use termchat_domain::{DomainError, ProviderKind};

/// Direct value if set and non-empty, otherwise the named environment variable.
fn resolve_secret(direct: Option<&String>, env_name: &str) -> Option<String> {
    direct
        .filter(|v| !v.is_empty())
        .cloned()
        .or_else(|| std::env::var(env_name).ok())
        .filter(|v| !v.is_empty())
}

/// Azure OpenAI deployment (`[providers.azure]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAzureConfig {
    /// Full chat-completions URL of the deployment.
    pub endpoint: Option<String>,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Environment variable holding the key (default: "AZURE_OPENAI_API_KEY").
    pub api_key_env: String,
    /// Model the deployment must report (default: "gpt-35-turbo").
    pub accepted_model: String,
    /// Content-filter severity every category must report (default: "safe").
    pub accepted_severity: String,
}

impl Default for FileAzureConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_key_env: "AZURE_OPENAI_API_KEY".to_string(),
            accepted_model: DEFAULT_ACCEPTED_MODEL.to_string(),
            accepted_severity: DEFAULT_ACCEPTED_SEVERITY.to_string(),
        }
    }
}

impl FileAzureConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_ref(), &self.api_key_env)
    }
}

/// OpenAI public API (`[providers.openai]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Chat-completions URL.
    pub endpoint: String,
    pub model: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            endpoint: openai::DEFAULT_ENDPOINT.to_string(),
            model: openai::DEFAULT_MODEL.to_string(),
        }
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_ref(), &self.api_key_env)
    }
}

/// GitHub Copilot OAuth app (`[providers.github_copilot]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGithubCopilotConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Environment variable holding the client secret
    /// (default: "TERMINAL_CHAT_GITHUB_CLIENT_SECRET").
    pub client_secret_env: String,
    pub token_endpoint: String,
    pub authorize_endpoint: String,
    pub graphql_endpoint: String,
    pub chat_endpoint: String,
    pub integration_id: String,
    pub user_agent: String,
    /// Where the token pair is persisted (default: data dir).
    pub token_file: Option<String>,
}

impl Default for FileGithubCopilotConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            client_secret_env: "TERMINAL_CHAT_GITHUB_CLIENT_SECRET".to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            authorize_endpoint: DEFAULT_AUTHORIZE_ENDPOINT.to_string(),
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            integration_id: DEFAULT_INTEGRATION_ID.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token_file: None,
        }
    }
}

impl FileGithubCopilotConfig {
    pub fn resolve_client_secret(&self) -> Option<String> {
        resolve_secret(self.client_secret.as_ref(), &self.client_secret_env)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Default provider: "azure", "openai", "github-copilot".
    pub default: Option<String>,
    /// Per-request timeout in seconds (unset: no timeout).
    pub request_timeout_secs: Option<u64>,
    pub azure: FileAzureConfig,
    pub openai: FileOpenAiConfig,
    pub github_copilot: FileGithubCopilotConfig,
}

impl FileProvidersConfig {
    /// The configured default provider, if any.
    pub fn default_kind(&self) -> Result<Option<ProviderKind>, DomainError> {
        self.default
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .transpose()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
