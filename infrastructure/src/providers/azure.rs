//! Azure OpenAI adapter.
//!
//! Talks to a single deployment's chat-completions URL with an `api-key`
//! header. Responses are only shown when they come from the accepted model
//! and carry the expected content-filter annotations.

use super::core::ProviderCore;
use super::http::{ChatHttpClient, extract_completion};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use termchat_application::{LlmProvider, ProviderError};
use termchat_domain::{
    BrandingData, ConversationHistory, LlmResponse, ProviderKind, TerminalContext,
    is_valid_azure_endpoint,
};
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "api-key";
const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.95;

pub const DEFAULT_ACCEPTED_MODEL: &str = "gpt-35-turbo";
pub const DEFAULT_ACCEPTED_SEVERITY: &str = "safe";

/// Filters whose severity must match the accepted level when present.
const SEVERITY_FILTERS: [&str; 4] = ["hate", "sexual", "violence", "self_harm"];
/// Filter that must be present at all.
const JAILBREAK_FILTER: &str = "jailbreak";

/// Which responses are allowed through to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilterPolicy {
    pub accepted_model: String,
    pub accepted_severity: String,
}

impl Default for ContentFilterPolicy {
    fn default() -> Self {
        Self {
            accepted_model: DEFAULT_ACCEPTED_MODEL.to_string(),
            accepted_severity: DEFAULT_ACCEPTED_SEVERITY.to_string(),
        }
    }
}

impl ContentFilterPolicy {
    /// Whether `response` came from the accepted model with content filtering on.
    pub fn accepts(&self, response: &Value) -> bool {
        if response.get("model").and_then(Value::as_str) != Some(self.accepted_model.as_str()) {
            return false;
        }

        let Some(filters) = response
            .pointer("/prompt_filter_results/0/content_filter_results")
            .or_else(|| response.pointer("/prompt_annotations/0/content_filter_results"))
        else {
            return false;
        };

        let severities_ok = SEVERITY_FILTERS.iter().all(|name| match filters.get(name) {
            Some(filter) => {
                filter.get("severity").and_then(Value::as_str)
                    == Some(self.accepted_severity.as_str())
            }
            None => true,
        });

        severities_ok && filters.get(JAILBREAK_FILTER).is_some()
    }
}

/// Connection settings for one Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureSettings {
    /// Full chat-completions URL including `api-version`
    pub endpoint: String,
    pub api_key: String,
    pub policy: ContentFilterPolicy,
    pub timeout: Option<Duration>,
}

pub struct AzureOpenAiProvider {
    core: ProviderCore,
    http: ChatHttpClient,
    endpoint: String,
    policy: ContentFilterPolicy,
}

impl AzureOpenAiProvider {
    pub fn new(settings: AzureSettings) -> Result<Self, ProviderError> {
        if !is_valid_azure_endpoint(&settings.endpoint) {
            return Err(ProviderError::Configuration(format!(
                "'{}' is not an Azure OpenAI endpoint (expected https://<resource>.openai.azure.com/...)",
                settings.endpoint
            )));
        }
        if settings.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "Azure OpenAI API key is not set".to_string(),
            ));
        }

        let http = ChatHttpClient::new(settings.timeout)?
            .with_header(API_KEY_HEADER, settings.api_key);

        Ok(Self {
            core: ProviderCore::new(),
            http,
            endpoint: settings.endpoint,
            policy: settings.policy,
        })
    }

    fn request_body(&self) -> Value {
        json!({
            "messages": self.core.messages(),
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "frequency_penalty": 0,
            "presence_penalty": 0,
            "top_p": TOP_P,
            "stop": "None",
        })
    }

    async fn request_completion(&mut self) -> Result<String, ProviderError> {
        let body = self.request_body();
        debug!(messages = self.core.history().len(), "Sending Azure OpenAI request");
        let json = self.http.post_json(&self.endpoint, &body).await?;

        if json.get("error").is_some() {
            return extract_completion(&json);
        }
        if !self.policy.accepts(&json) {
            let model = json.get("model").and_then(Value::as_str).unwrap_or("");
            warn!(
                model = model,
                "Azure OpenAI response rejected by deployment checks"
            );
            return Err(ProviderError::InvalidModel);
        }
        extract_completion(&json)
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AzureOpenAi
    }

    fn branding(&self) -> BrandingData {
        BrandingData::for_kind(ProviderKind::AzureOpenAi)
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
                warn!(error = %e, "Azure OpenAI request failed");
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
    use termchat_domain::{ErrorType, INVALID_MODEL_MESSAGE, UNKNOWN_ERROR_MESSAGE};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn filtered_response(model: &str, content: &str) -> Value {
        json!({
            "model": model,
            "prompt_filter_results": [{
                "prompt_index": 0,
                "content_filter_results": {
                    "hate": {"filtered": false, "severity": "safe"},
                    "self_harm": {"filtered": false, "severity": "safe"},
                    "sexual": {"filtered": false, "severity": "safe"},
                    "violence": {"filtered": false, "severity": "safe"},
                    "jailbreak": {"filtered": false, "detected": false}
                }
            }],
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    // Only the scheme and host are checked, so a path-style suffix lets tests
    // point the provider at a local mock.
    fn provider_for(server: &MockServer) -> AzureOpenAiProvider {
        let mut provider = AzureOpenAiProvider::new(AzureSettings {
            endpoint: "https://contoso.openai.azure.com/openai/deployments/gpt/chat/completions"
                .to_string(),
            api_key: "secret".to_string(),
            policy: ContentFilterPolicy::default(),
            timeout: None,
        })
        .unwrap();
        provider.endpoint = format!("{}/openai/deployments/gpt/chat/completions", server.uri());
        provider
    }

    #[test]
    fn test_policy_accepts_annotated_response() {
        let policy = ContentFilterPolicy::default();
        assert!(policy.accepts(&filtered_response("gpt-35-turbo", "hi")));
    }

    #[test]
    fn test_policy_accepts_legacy_prompt_annotations() {
        let policy = ContentFilterPolicy::default();
        let mut response = filtered_response("gpt-35-turbo", "hi");
        let filters = response["prompt_filter_results"].take();
        response["prompt_annotations"] = filters;
        assert!(policy.accepts(&response));
    }

    #[test]
    fn test_policy_rejects_wrong_model_regardless_of_content() {
        let policy = ContentFilterPolicy::default();
        assert!(!policy.accepts(&filtered_response("gpt-4", "hi")));
    }

    #[test]
    fn test_policy_rejects_missing_filters_or_jailbreak() {
        let policy = ContentFilterPolicy::default();

        let mut no_filters = filtered_response("gpt-35-turbo", "hi");
        no_filters
            .as_object_mut()
            .unwrap()
            .remove("prompt_filter_results");
        assert!(!policy.accepts(&no_filters));

        let mut no_jailbreak = filtered_response("gpt-35-turbo", "hi");
        no_jailbreak["prompt_filter_results"][0]["content_filter_results"]
            .as_object_mut()
            .unwrap()
            .remove("jailbreak");
        assert!(!policy.accepts(&no_jailbreak));
    }

    #[test]
    fn test_policy_checks_severity_only_when_present() {
        let policy = ContentFilterPolicy::default();

        let mut missing_hate = filtered_response("gpt-35-turbo", "hi");
        missing_hate["prompt_filter_results"][0]["content_filter_results"]
            .as_object_mut()
            .unwrap()
            .remove("hate");
        assert!(policy.accepts(&missing_hate));

        let mut medium = filtered_response("gpt-35-turbo", "hi");
        medium["prompt_filter_results"][0]["content_filter_results"]["violence"]["severity"] =
            json!("medium");
        assert!(!policy.accepts(&medium));
    }

    #[test]
    fn test_policy_is_configurable() {
        let policy = ContentFilterPolicy {
            accepted_model: "gpt-4o".to_string(),
            accepted_severity: "low".to_string(),
        };
        let mut response = filtered_response("gpt-4o", "hi");
        for name in SEVERITY_FILTERS {
            response["prompt_filter_results"][0]["content_filter_results"][name]["severity"] =
                json!("low");
        }
        assert!(policy.accepts(&response));
    }

    #[test]
    fn test_rejects_non_azure_endpoint() {
        let result = AzureOpenAiProvider::new(AzureSettings {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "k".to_string(),
            policy: ContentFilterPolicy::default(),
            timeout: None,
        });
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_sends_deployment_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt/chat/completions"))
            .and(header("api-key", "secret"))
            .and(body_partial_json(json!({
                "max_tokens": 800,
                "temperature": 0.7,
                "top_p": 0.95,
                "stop": "None",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "list files. The shell I am running is bash"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(filtered_response("gpt-35-turbo", "Use `ls`.")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        provider.set_system_prompt("sys");
        provider.set_context(TerminalContext::new("bash"));

        let response = provider.get_response("list files").await;
        assert_eq!(response.message, "Use `ls`.");
        assert_eq!(response.error_type, ErrorType::None);
        assert_eq!(provider.history().len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_model_gets_invalid_model_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(filtered_response("gpt-4", "answer")),
            )
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        let response = provider.get_response("q").await;

        assert_eq!(response.message, INVALID_MODEL_MESSAGE);
        assert_eq!(response.error_type, ErrorType::InvalidModel);
        assert_eq!(provider.history().len(), 2);
    }

    #[tokio::test]
    async fn test_vendor_error_is_shown_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": "content_filter", "message": "The response was filtered"}
            })))
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        let response = provider.get_response("q").await;

        assert_eq!(response.message, "The response was filtered");
        assert_eq!(response.error_type, ErrorType::FromProvider);
    }

    #[tokio::test]
    async fn test_garbage_body_is_unknown_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
            .mount(&server)
            .await;

        let mut provider = provider_for(&server);
        let response = provider.get_response("q").await;

        assert_eq!(response.message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(response.error_type, ErrorType::Unknown);
        assert_eq!(provider.history().messages()[1].content, UNKNOWN_ERROR_MESSAGE);
    }
}
