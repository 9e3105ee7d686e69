//! Vendor adapters implementing [`LlmProvider`].
//!
//! Each adapter owns its request shaping and response validation; the shared
//! pieces are the JSON HTTP client ([`http`]) and the history bookkeeping
//! ([`core`]). [`build_provider`] turns the `[providers]` config section into a
//! ready-to-use boxed provider.

pub mod azure;
pub mod core;
pub mod github_copilot;
pub mod http;
pub mod openai;

use crate::config::FileProvidersConfig;
use azure::{AzureOpenAiProvider, AzureSettings, ContentFilterPolicy};
use github_copilot::{GithubCopilotProvider, GithubCopilotSettings};
use openai::{OpenAiProvider, OpenAiSettings};
use termchat_application::{HostEventSender, LlmProvider, ProviderError};
use termchat_domain::{AuthValues, ProviderKind, TokenPair};
use tracing::info;

pub fn azure_settings(config: &FileProvidersConfig) -> Result<AzureSettings, ProviderError> {
    let azure = &config.azure;
    let endpoint = azure
        .endpoint
        .clone()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            ProviderError::Configuration("providers.azure.endpoint is not set".to_string())
        })?;
    let api_key = azure.resolve_api_key().ok_or_else(|| {
        ProviderError::Configuration(format!(
            "Azure OpenAI key not found (set providers.azure.api_key or ${})",
            azure.api_key_env
        ))
    })?;

    Ok(AzureSettings {
        endpoint,
        api_key,
        policy: ContentFilterPolicy {
            accepted_model: azure.accepted_model.clone(),
            accepted_severity: azure.accepted_severity.clone(),
        },
        timeout: config.request_timeout(),
    })
}

pub fn openai_settings(config: &FileProvidersConfig) -> Result<OpenAiSettings, ProviderError> {
    let openai = &config.openai;
    let api_key = openai.resolve_api_key().ok_or_else(|| {
        ProviderError::Configuration(format!(
            "OpenAI key not found (set providers.openai.api_key or ${})",
            openai.api_key_env
        ))
    })?;

    Ok(OpenAiSettings {
        api_key,
        endpoint: openai.endpoint.clone(),
        model: openai.model.clone(),
        timeout: config.request_timeout(),
    })
}

pub fn github_copilot_settings(
    config: &FileProvidersConfig,
) -> Result<GithubCopilotSettings, ProviderError> {
    let copilot = &config.github_copilot;
    let client_id = copilot
        .client_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ProviderError::Configuration(
                "providers.github_copilot.client_id is not set".to_string(),
            )
        })?;
    let client_secret = copilot.resolve_client_secret().ok_or_else(|| {
        ProviderError::Configuration(format!(
            "GitHub OAuth client secret not found (set providers.github_copilot.client_secret or ${})",
            copilot.client_secret_env
        ))
    })?;

    Ok(GithubCopilotSettings {
        client_id,
        client_secret,
        token_endpoint: copilot.token_endpoint.clone(),
        authorize_endpoint: copilot.authorize_endpoint.clone(),
        graphql_endpoint: copilot.graphql_endpoint.clone(),
        chat_endpoint: copilot.chat_endpoint.clone(),
        integration_id: copilot.integration_id.clone(),
        user_agent: copilot.user_agent.clone(),
        timeout: config.request_timeout(),
    })
}

/// Construct the provider for `kind` from configuration.
///
/// For GitHub Copilot, `stored_tokens` (from a previous sign-in) are applied
/// before returning, which also resolves the user's endpoint. Without tokens
/// the provider is returned unauthenticated.
pub async fn build_provider(
    kind: ProviderKind,
    config: &FileProvidersConfig,
    stored_tokens: Option<TokenPair>,
    events: Option<HostEventSender>,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    let provider: Box<dyn LlmProvider> = match kind {
        ProviderKind::AzureOpenAi => Box::new(AzureOpenAiProvider::new(azure_settings(config)?)?),
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(openai_settings(config)?)?),
        ProviderKind::GithubCopilot => {
            let mut provider = GithubCopilotProvider::new(github_copilot_settings(config)?)?;
            if let Some(tx) = events {
                provider = provider.with_event_sender(tx);
            }
            if let Some(tokens) = stored_tokens {
                provider
                    .set_authentication(&AuthValues::Tokens(tokens).to_json())
                    .await;
            }
            Box::new(provider)
        }
    };

    info!(provider = %kind, "Provider initialized");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    fn config(toml_str: &str) -> FileProvidersConfig {
        toml::from_str::<FileConfig>(toml_str).unwrap().providers
    }

    #[test]
    fn test_azure_requires_endpoint_and_key() {
        let missing = config("[providers.azure]\napi_key_env = \"TERMINAL_CHAT_TEST_UNSET\"\n");
        assert!(matches!(
            azure_settings(&missing),
            Err(ProviderError::Configuration(msg)) if msg.contains("endpoint")
        ));

        let no_key = config(
            "[providers.azure]\nendpoint = \"https://x.openai.azure.com/c\"\napi_key_env = \"TERMINAL_CHAT_TEST_UNSET\"\n",
        );
        assert!(matches!(
            azure_settings(&no_key),
            Err(ProviderError::Configuration(msg)) if msg.contains("TERMINAL_CHAT_TEST_UNSET")
        ));
    }

    #[test]
    fn test_azure_settings_carry_policy_and_timeout() {
        let providers = config(
            r#"
[providers]
request_timeout_secs = 15

[providers.azure]
endpoint = "https://x.openai.azure.com/c"
api_key = "k"
accepted_model = "gpt-4"
"#,
        );
        let settings = azure_settings(&providers).unwrap();
        assert_eq!(settings.policy.accepted_model, "gpt-4");
        assert_eq!(settings.policy.accepted_severity, "safe");
        assert_eq!(settings.timeout, Some(std::time::Duration::from_secs(15)));
    }

    #[test]
    fn test_copilot_requires_client_id() {
        let providers = config("[providers.github_copilot]\nclient_secret = \"s\"\n");
        assert!(matches!(
            github_copilot_settings(&providers),
            Err(ProviderError::Configuration(msg)) if msg.contains("client_id")
        ));
    }

    #[tokio::test]
    async fn test_builds_each_configured_provider() {
        let providers = config(
            r#"
[providers.azure]
endpoint = "https://x.openai.azure.com/c"
api_key = "k"

[providers.openai]
api_key = "sk"

[providers.github_copilot]
client_id = "id"
client_secret = "s"
"#,
        );

        for kind in ProviderKind::ALL {
            let provider = build_provider(kind, &providers, None, None).await.unwrap();
            assert_eq!(provider.kind(), kind);
            assert!(provider.history().is_empty());
        }
    }

    #[tokio::test]
    async fn test_invalid_azure_endpoint_is_rejected() {
        let providers = config(
            "[providers.azure]\nendpoint = \"https://example.com/chat\"\napi_key = \"k\"\n",
        );
        let result = build_provider(ProviderKind::AzureOpenAi, &providers, None, None).await;
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }
}
