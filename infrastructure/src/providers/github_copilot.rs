//! GitHub Copilot adapter.
//!
//! Authentication follows GitHub's OAuth web flow. The host opens
//! [`GithubCopilotProvider::authorize_url`] in a browser, captures the redirect
//! and hands it back through [`GithubCopilotProvider::set_authentication`]
//! together with the `state` nonce it generated. The provider redeems the code
//! for an access/refresh token pair, reports the pair through
//! [`HostEvent::AuthChanged`] so the host can persist it, and asks the GraphQL
//! API for the user's Copilot endpoint and login.
//!
//! Any failed chat or viewer request is retried exactly once after a token
//! refresh. A vendor `error` object is final and is not retried.

use super::core::ProviderCore;
use super::http::{ChatHttpClient, extract_completion};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use termchat_application::{HostEvent, HostEventSender, LlmProvider, ProviderError, notify_host};
use termchat_domain::{
    AuthState, AuthValues, AuthenticationResult, BrandingData, ConversationHistory, LlmResponse,
    ProviderKind, TerminalContext, TokenPair, UNKNOWN_ERROR_MESSAGE,
};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.githubcopilot.com/chat/completions";
pub const DEFAULT_INTEGRATION_ID: &str = "terminal-chat";
pub const DEFAULT_USER_AGENT: &str = "terminal-chat";

const CHAT_COMPLETION_SUFFIX: &str = "/chat/completions";
const VIEWER_QUERY: &str = "{ viewer { copilotEndpoints { api } login } }";
const RESPONSE_ATTRIBUTION: &str = "GitHub Copilot";

/// OAuth app credentials and endpoints.
#[derive(Debug, Clone)]
pub struct GithubCopilotSettings {
    pub client_id: String,
    pub client_secret: String,
    pub token_endpoint: String,
    pub authorize_endpoint: String,
    pub graphql_endpoint: String,
    /// Used until the viewer query resolves the user's own endpoint.
    pub chat_endpoint: String,
    pub integration_id: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl GithubCopilotSettings {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            authorize_endpoint: DEFAULT_AUTHORIZE_ENDPOINT.to_string(),
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            integration_id: DEFAULT_INTEGRATION_ID.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

pub struct GithubCopilotProvider {
    core: ProviderCore,
    http: ChatHttpClient,
    settings: GithubCopilotSettings,
    state: AuthState,
    tokens: Option<TokenPair>,
    endpoint: String,
    username: Option<String>,
    events: Option<HostEventSender>,
}

impl GithubCopilotProvider {
    pub fn new(settings: GithubCopilotSettings) -> Result<Self, ProviderError> {
        if settings.client_id.is_empty() {
            return Err(ProviderError::Configuration(
                "GitHub OAuth client_id is not set".to_string(),
            ));
        }

        let http = ChatHttpClient::new(settings.timeout)?
            .with_header("Accept", "application/json")
            .with_header("Copilot-Integration-Id", settings.integration_id.clone())
            .with_header("User-Agent", settings.user_agent.clone());

        Ok(Self {
            core: ProviderCore::new(),
            http,
            endpoint: settings.chat_endpoint.clone(),
            settings,
            state: AuthState::Unauthenticated,
            tokens: None,
            username: None,
            events: None,
        })
    }

    /// Route auth notifications into `tx`.
    pub fn with_event_sender(mut self, tx: HostEventSender) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn auth_state(&self) -> AuthState {
        self.state
    }

    /// Chat-completions URL currently in use.
    pub fn chat_endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GitHub login, once the viewer query has succeeded.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    /// Browser URL for the authorize step. `state` must come back unchanged
    /// in the redirect.
    pub fn authorize_url(&self, state: &str) -> Result<String, ProviderError> {
        Url::parse_with_params(
            &self.settings.authorize_endpoint,
            [("client_id", self.settings.client_id.as_str()), ("state", state)],
        )
        .map(String::from)
        .map_err(|e| ProviderError::Configuration(format!("authorize endpoint: {}", e)))
    }

    /// Feed the host's credentials document to the provider.
    ///
    /// A redirect whose `state` query parameter doesn't match the expected
    /// nonce is ignored outright: no request is made and the state is left
    /// alone. Outcomes of the code exchange are reported as
    /// [`HostEvent::AuthChanged`].
    pub async fn set_authentication(&mut self, auth_values: &str) {
        if auth_values.trim().is_empty() {
            return;
        }

        let values = match AuthValues::parse(auth_values) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed GitHub Copilot credentials");
                return;
            }
        };

        match values {
            AuthValues::RedirectUrl { url, state } => {
                let parsed = match Url::parse(&url) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        warn!(error = %e, "Ignoring unparsable OAuth redirect URL");
                        return;
                    }
                };
                if query_param(&parsed, "state").as_deref() != Some(state.as_str()) {
                    warn!("OAuth state mismatch, ignoring redirect");
                    return;
                }
                let code = query_param(&parsed, "code").unwrap_or_default();
                self.complete_auth_with_code(&code).await;
            }
            AuthValues::Tokens(pair) => {
                self.apply_tokens(pair);
                self.obtain_username_and_endpoint().await;
            }
        }
    }

    async fn complete_auth_with_code(&mut self, code: &str) {
        self.state = AuthState::AwaitingAuthorizationCode;
        let body = json!({
            "client_id": self.settings.client_id,
            "client_secret": self.settings.client_secret,
            "code": code,
        });

        let result = match self.http.post_json(&self.settings.token_endpoint, &body).await {
            Ok(json) if json.get("error").is_some() => Err(json
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ERROR_MESSAGE)
                .to_string()),
            Ok(json) => token_pair_from(&json).ok_or_else(|| self.http.last_response_or_unknown()),
            Err(e) => {
                warn!(error = %e, "OAuth code exchange failed");
                Err(self.http.last_response_or_unknown())
            }
        };

        match result {
            Ok(pair) => {
                info!("GitHub Copilot authorization complete");
                self.apply_tokens(pair.clone());
                self.notify(HostEvent::AuthChanged(AuthenticationResult::success(pair)));
                self.obtain_username_and_endpoint().await;
            }
            Err(message) => {
                warn!("GitHub Copilot authorization failed");
                self.state = AuthState::Unauthenticated;
                self.notify(HostEvent::AuthChanged(AuthenticationResult::failure(message)));
            }
        }
    }

    fn apply_tokens(&mut self, pair: TokenPair) {
        self.http.set_bearer(pair.access_token.clone());
        self.tokens = Some(pair);
        self.state = AuthState::Authenticated;
    }

    fn notify(&self, event: HostEvent) {
        notify_host(self.events.as_ref(), event);
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// On success the new bearer is used for every later request and the pair
    /// is reported to the host. On failure the provider drops back to
    /// `Unauthenticated`.
    pub async fn refresh_tokens(&mut self) {
        let Some(refresh_token) = self.tokens.as_ref().map(|t| t.refresh_token.clone()) else {
            warn!("No GitHub refresh token available");
            self.state = AuthState::Unauthenticated;
            return;
        };

        self.state = AuthState::RefreshingTokens;
        let body = json!({
            "client_id": self.settings.client_id,
            "grant_type": "refresh_token",
            "client_secret": self.settings.client_secret,
            "refresh_token": refresh_token,
        });

        let refreshed = match self.http.post_json(&self.settings.token_endpoint, &body).await {
            Ok(json) => token_pair_from(&json),
            Err(e) => {
                warn!(error = %e, "Token refresh request failed");
                None
            }
        };

        match refreshed {
            Some(pair) => {
                info!("GitHub Copilot tokens refreshed");
                self.apply_tokens(pair.clone());
                self.notify(HostEvent::AuthChanged(AuthenticationResult::success(pair)));
            }
            None => {
                warn!("GitHub Copilot token refresh failed");
                self.state = AuthState::Unauthenticated;
            }
        }
    }

    async fn fetch_viewer(&mut self) -> Result<(String, String), ProviderError> {
        let body = json!({ "query": VIEWER_QUERY });
        let json = self.http.post_json(&self.settings.graphql_endpoint, &body).await?;

        let viewer = json
            .pointer("/data/viewer")
            .ok_or_else(|| ProviderError::MissingField("data.viewer".to_string()))?;
        let login = viewer
            .get("login")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::MissingField("viewer.login".to_string()))?;
        let api = viewer
            .pointer("/copilotEndpoints/api")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::MissingField("viewer.copilotEndpoints.api".to_string()))?;

        Ok((login.to_string(), api.to_string()))
    }

    async fn obtain_username_and_endpoint(&mut self) {
        let mut refresh_attempted = false;
        loop {
            match self.fetch_viewer().await {
                Ok((login, api)) => {
                    self.endpoint = format!("{}{}", api.trim_end_matches('/'), CHAT_COMPLETION_SUFFIX);
                    info!(user = %login, endpoint = %self.endpoint, "Resolved Copilot endpoint");
                    self.username = Some(login);
                    return;
                }
                Err(e) => {
                    warn!(error = %e, refresh_attempted, "Copilot viewer query failed");
                    if refresh_attempted {
                        return;
                    }
                    self.refresh_tokens().await;
                    refresh_attempted = true;
                }
            }
        }
    }

    async fn request_completion(&mut self, body: &Value) -> Result<String, ProviderError> {
        let json = self.http.post_json(&self.endpoint, body).await?;
        extract_completion(&json)
    }
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn token_pair_from(json: &Value) -> Option<TokenPair> {
    let access = json.get("access_token").and_then(Value::as_str)?;
    let refresh = json.get("refresh_token").and_then(Value::as_str)?;
    (!access.is_empty() && !refresh.is_empty()).then(|| TokenPair::new(access, refresh))
}

#[async_trait]
impl LlmProvider for GithubCopilotProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GithubCopilot
    }

    fn branding(&self) -> BrandingData {
        BrandingData {
            query_attribution: self.username.clone().unwrap_or_default(),
            ..BrandingData::for_kind(ProviderKind::GithubCopilot)
        }
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
        // The user turn is recorded once, however many attempts follow.
        self.core.push_user(prompt);
        let body = json!({ "messages": self.core.messages() });
        debug!(messages = self.core.history().len(), "Sending Copilot request");

        let mut refresh_attempted = false;
        let response = loop {
            match self.request_completion(&body).await {
                Ok(text) => break LlmResponse::success(text),
                Err(e) if !e.is_retryable() => {
                    warn!(error = %e, "Copilot returned an error");
                    break e.into_response();
                }
                Err(e) => {
                    warn!(error = %e, refresh_attempted, "Copilot request failed");
                    if refresh_attempted {
                        break LlmResponse::unknown(self.http.last_response_or_unknown());
                    }
                    self.refresh_tokens().await;
                    refresh_attempted = true;
                }
            }
        }
        .with_attribution(RESPONSE_ATTRIBUTION);

        self.core.push_assistant(&response.message);
        response
    }
}
