//! OpenAI public API adapter.

use super::core::ProviderCore;
use super::http::{ChatHttpClient, extract_completion};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use termchat_application::{LlmProvider, ProviderError};
use termchat_domain::{BrandingData, ConversationHistory, LlmResponse, ProviderKind, TerminalContext};
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl OpenAiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

pub struct OpenAiProvider {
    core: ProviderCore,
    http: ChatHttpClient,
    endpoint: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(settings: OpenAiSettings) -> Result<Self, ProviderError> {
        if settings.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "OpenAI API key is not set".to_string(),
            ));
        }

        let mut http = ChatHttpClient::new(settings.timeout)?;
        http.set_bearer(settings.api_key);

        Ok(Self {
            core: ProviderCore::new(),
            http,
            endpoint: settings.endpoint,
            model: settings.model,
        })
    }

    fn request_body(&self) -> Value {
        json!({
            "model": self.model,
            "messages": self.core.messages(),
            "temperature": 0,
        })
    }

    async fn request_completion(&mut self) -> Result<String, ProviderError> {
        let body = self.request_body();
        debug!(model = %self.model, messages = self.core.history().len(), "Sending OpenAI request");
        let json = self.http.post_json(&self.endpoint, &body).await?;
        extract_completion(&json)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn branding(&self) -> BrandingData {
        BrandingData::for_kind(ProviderKind::OpenAi)
    }

    fn history(&self) -> &ConversationHistory {
        self.core.history()
    }

    fn set_system_prompt(&mut self, system_prompt: &str) {
        self.core.set_system_prompt(system_prompt);
    }

    fn set_context(&mut self, context: TerminalContext) {
        self.core.set_context(context);
    }

    fn clear_message_history(&mut self) {
        self.core.clear_message_history();
    }

    async fn get_response(&mut self, prompt: &str) -> LlmResponse {
        self.core.push_user(prompt);

        let response = match self.request_completion().await {
            Ok(text) => LlmResponse::success(text),
            Err(e) => {
                warn!(error = %e, "OpenAI request failed");
                e.into_response()
            }
        };

        self.core.push_assistant(&response.message);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termchat_domain::{ErrorType, Role, UNKNOWN_ERROR_MESSAGE};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new(OpenAiSettings {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            ..OpenAiSettings::new("sk-test")
        })
        .unwrap()
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        assert!(matches!(
            OpenAiProvider::new(OpenAiSettings::new("")),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_sends_model_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0,
                "messages": [{"role": "user", "content": "undo my last commit"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "git reset HEAD~1"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        let response = provider.get_response("undo my last commit").await;

        assert_eq!(response.message, "git reset HEAD~1");
        assert_eq!(response.error_type, ErrorType::None);
        assert!(response.attribution.is_empty());
    }

    #[tokio::test]
    async fn test_history_grows_by_two_even_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        provider.set_system_prompt("sys");

        let first = provider.get_response("one").await;
        let second = provider.get_response("two").await;

        assert_eq!(first.error_type, ErrorType::Unknown);
        assert_eq!(second.message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(provider.history().len(), 5);
        assert_eq!(provider.history().count_role(Role::Assistant), 2);
    }

    #[tokio::test]
    async fn test_quota_error_comes_from_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}
            })))
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        let response = provider.get_response("q").await;

        assert_eq!(response.message, "You exceeded your current quota");
        assert_eq!(response.error_type, ErrorType::FromProvider);
    }

    #[tokio::test]
    async fn test_clear_then_prime_resets_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        provider.get_response("q").await;
        provider.clear_message_history();
        provider.set_system_prompt("fresh");

        assert_eq!(provider.history().len(), 1);
        assert_eq!(provider.history().messages()[0].role, Role::System);
    }
}
