//! LLM provider value objects
//!
//! Identifies the supported vendors and the branding shown in the chat
//! header, plus endpoint checks shared by configuration and the palette.

use crate::core::error::DomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Supported LLM vendors (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Azure OpenAI deployment (endpoint + key)
    #[serde(rename = "azure")]
    AzureOpenAi,
    /// OpenAI public API (key)
    #[serde(rename = "openai")]
    OpenAi,
    /// GitHub Copilot (OAuth tokens)
    #[serde(rename = "github-copilot")]
    GithubCopilot,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::AzureOpenAi,
        ProviderKind::OpenAi,
        ProviderKind::GithubCopilot,
    ];

    /// Configuration identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AzureOpenAi => "azure",
            ProviderKind::OpenAi => "openai",
            ProviderKind::GithubCopilot => "github-copilot",
        }
    }

    /// Human-readable vendor name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::AzureOpenAi => "Azure OpenAI",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::GithubCopilot => "GitHub Copilot",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" | "azure-openai" | "azureopenai" => Ok(ProviderKind::AzureOpenAi),
            "openai" | "open-ai" => Ok(ProviderKind::OpenAi),
            "github-copilot" | "githubcopilot" | "copilot" | "github" => {
                Ok(ProviderKind::GithubCopilot)
            }
            other => Err(DomainError::InvalidProvider(other.to_string())),
        }
    }
}

/// Text and icons the chat header shows for the active provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandingData {
    pub name: String,
    pub header_text: String,
    pub subheader_text: String,
    pub header_icon_path: String,
    pub badge_icon_path: String,
    /// Shown above the user's queries; the signed-in username when known.
    pub query_attribution: String,
}

impl BrandingData {
    /// Branding used when no provider is configured.
    pub fn terminal_chat() -> Self {
        Self {
            name: String::new(),
            header_text: "Terminal Chat".to_string(),
            subheader_text: "Ask about shell commands in natural language".to_string(),
            header_icon_path: "icons/terminal-chat.png".to_string(),
            badge_icon_path: String::new(),
            query_attribution: String::new(),
        }
    }

    pub fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::AzureOpenAi | ProviderKind::OpenAi => Self {
                name: kind.display_name().to_string(),
                ..Self::terminal_chat()
            },
            ProviderKind::GithubCopilot => Self {
                name: kind.display_name().to_string(),
                header_text: "GitHub Copilot".to_string(),
                subheader_text: "Chat with GitHub Copilot about shell commands".to_string(),
                header_icon_path: "icons/github-copilot-logo.png".to_string(),
                badge_icon_path: "icons/github-copilot-badge.png".to_string(),
                query_attribution: String::new(),
            },
        }
    }
}

static AZURE_OPENAI_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https.*openai\.azure\.com").expect("static regex is valid")
});

/// Whether `endpoint` looks like an Azure OpenAI resource URL.
pub fn is_valid_azure_endpoint(endpoint: &str) -> bool {
    AZURE_OPENAI_ENDPOINT.is_match(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_accepts_aliases() {
        assert_eq!(
            "Copilot".parse::<ProviderKind>().unwrap(),
            ProviderKind::GithubCopilot
        );
        assert_eq!(
            "azure-openai".parse::<ProviderKind>().unwrap(),
            ProviderKind::AzureOpenAi
        );
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_kind_deserializes_from_config_names() {
        let kind: ProviderKind = serde_json::from_str("\"github-copilot\"").unwrap();
        assert_eq!(kind, ProviderKind::GithubCopilot);
        let kind: ProviderKind = serde_json::from_str("\"azure\"").unwrap();
        assert_eq!(kind, ProviderKind::AzureOpenAi);
    }

    #[test]
    fn test_azure_endpoint_validation() {
        assert!(is_valid_azure_endpoint(
            "https://contoso.openai.azure.com/openai/deployments/gpt/chat/completions?api-version=2024-02-01"
        ));
        assert!(!is_valid_azure_endpoint("http://contoso.openai.azure.com"));
        assert!(!is_valid_azure_endpoint("https://api.openai.com/v1"));
    }

    #[test]
    fn test_copilot_branding_has_badge() {
        let branding = BrandingData::for_kind(ProviderKind::GithubCopilot);
        assert_eq!(branding.name, "GitHub Copilot");
        assert!(!branding.badge_icon_path.is_empty());
        assert!(BrandingData::for_kind(ProviderKind::OpenAi).badge_icon_path.is_empty());
    }
}
