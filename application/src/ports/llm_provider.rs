//! LLM Provider port
//!
//! Defines the single capability every vendor adapter implements. The chat
//! palette only ever talks to a `Box<dyn LlmProvider>`; request shaping,
//! authentication and response parsing stay inside the adapter.

use async_trait::async_trait;
use termchat_domain::{
    BrandingData, ConversationHistory, ErrorType, LlmResponse, ProviderKind, TerminalContext,
    UNKNOWN_ERROR_MESSAGE,
};
use thiserror::Error;

/// Errors that can occur inside a provider while producing a response.
///
/// These never cross the [`LlmProvider`] boundary as `Err`; adapters turn
/// them into an [`LlmResponse`] via [`ProviderError::into_response`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    InvalidJson { error: String, raw: String },

    #[error("Missing field in response: {0}")]
    MissingField(String),

    /// The vendor answered with an `error` object.
    #[error("{0}")]
    FromProvider(String),

    #[error("Response rejected by deployment checks")]
    InvalidModel,

    #[error("Request timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Whether a token refresh might fix this failure.
    ///
    /// Vendor-reported errors and content-filter rejections are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ProviderError::FromProvider(_)
                | ProviderError::InvalidModel
                | ProviderError::Configuration(_)
        )
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ProviderError::FromProvider(_) => ErrorType::FromProvider,
            ProviderError::InvalidModel => ErrorType::InvalidModel,
            ProviderError::Configuration(_) => ErrorType::InvalidAuth,
            ProviderError::Http(_)
            | ProviderError::InvalidJson { .. }
            | ProviderError::MissingField(_)
            | ProviderError::Timeout => ErrorType::Unknown,
        }
    }

    /// Convert into the response shown to the user.
    ///
    /// Vendor messages are shown verbatim; anything else gets the generic
    /// message so raw transport errors don't leak into the transcript.
    pub fn into_response(self) -> LlmResponse {
        match self {
            ProviderError::FromProvider(message) => LlmResponse::from_provider(message),
            ProviderError::InvalidModel => LlmResponse::invalid_model(),
            other => LlmResponse::new(UNKNOWN_ERROR_MESSAGE, other.error_type()),
        }
    }
}

/// A vendor-specific adapter that turns a user prompt into an LLM request.
///
/// Implementations own the conversation history: every `get_response` call
/// appends exactly one `user` and one `assistant` entry, whether the request
/// succeeded or not.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Which vendor this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Header text, icons and attribution for the chat UI.
    fn branding(&self) -> BrandingData;

    /// The messages that will be sent with the next request.
    fn history(&self) -> &ConversationHistory;

    /// Append a `system` message to the history.
    fn set_system_prompt(&mut self, system_prompt: &str);

    /// Replace the terminal context used to engineer prompts.
    fn set_context(&mut self, context: TerminalContext);

    /// Drop every message from the history.
    fn clear_message_history(&mut self);

    /// Send `prompt` (with the conversation so far) and return the reply.
    async fn get_response(&mut self, prompt: &str) -> LlmResponse;
}
