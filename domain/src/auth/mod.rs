//! Authentication value objects for token-based providers.
//!
//! The host hands a provider its credentials as a small JSON document: either
//! the redirect URL captured from the browser after the user authorized the
//! app, or a token pair persisted from an earlier session.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// OAuth access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// `{"access_token": ..., "refresh_token": ...}`, the form hosts persist.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "access_token": self.access_token,
            "refresh_token": self.refresh_token,
        })
        .to_string()
    }
}

/// Credentials handed to a provider by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValues {
    /// Browser redirect captured after authorization, plus the `state` nonce
    /// the host generated when it opened the authorize page.
    RedirectUrl { url: String, state: String },
    /// Previously persisted tokens.
    Tokens(TokenPair),
}

impl AuthValues {
    /// Parse the host's JSON credentials document.
    ///
    /// `{url, state}` wins over `{access_token, refresh_token}` when both are
    /// present. Any other shape is rejected.
    pub fn parse(json: &str) -> Result<Self, DomainError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidAuthValues(e.to_string()))?;

        let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);

        if let (Some(url), Some(state)) = (field("url"), field("state")) {
            return Ok(AuthValues::RedirectUrl { url, state });
        }
        if let (Some(access), Some(refresh)) = (field("access_token"), field("refresh_token")) {
            return Ok(AuthValues::Tokens(TokenPair::new(access, refresh)));
        }

        Err(DomainError::InvalidAuthValues(
            "expected {url, state} or {access_token, refresh_token}".to_string(),
        ))
    }

    pub fn redirect(url: impl Into<String>, state: impl Into<String>) -> Self {
        AuthValues::RedirectUrl {
            url: url.into(),
            state: state.into(),
        }
    }

    pub fn to_json(&self) -> String {
        match self {
            AuthValues::RedirectUrl { url, state } => {
                serde_json::json!({"url": url, "state": state}).to_string()
            }
            AuthValues::Tokens(pair) => pair.to_json(),
        }
    }
}

/// OAuth state of a token-based provider.
///
/// ```text
/// Unauthenticated → AwaitingAuthorizationCode → Authenticated
///                                                 │ (API call fails)
///                                                 ▼
///                           Authenticated ← RefreshingTokens → Unauthenticated
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Unauthenticated,
    AwaitingAuthorizationCode,
    Authenticated,
    RefreshingTokens,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Payload of the "auth changed" notification.
///
/// Exactly one of the fields is set: an error to show the user, or the new
/// token pair for the host to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    pub error_message: Option<String>,
    pub tokens: Option<TokenPair>,
}

impl AuthenticationResult {
    pub fn success(tokens: TokenPair) -> Self {
        Self {
            error_message: None,
            tokens: Some(tokens),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            tokens: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.tokens.is_some()
    }
}
