//! Provider response value object.
//!
//! Providers never hand errors back to the chat palette as `Err`: every
//! outcome becomes an [`LlmResponse`] whose [`ErrorType`] tells the host
//! whether the text came from the model or describes a failure.

use serde::{Deserialize, Serialize};

/// Shown when a request failed without a more specific message.
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An error occurred. Your AI provider might not be correctly configured, or the service might be temporarily unavailable.";

/// Shown when an Azure OpenAI response fails the deployment checks.
pub const INVALID_MODEL_MESSAGE: &str =
    "Terminal Chat only supports gpt-35-turbo deployments with content filtering enabled. Please check your Azure OpenAI deployment.";

/// Shown when the palette has no provider configured.
pub const MISSING_PROVIDER_MESSAGE: &str =
    "No AI provider is configured. Set up a provider in your configuration to start chatting.";

/// Classification of a response for the host (telemetry, styling).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The text is the model's answer.
    #[default]
    None,
    /// The vendor returned an `error` object; its message is shown verbatim.
    FromProvider,
    /// The response failed the content-filter / deployment checks.
    InvalidModel,
    /// No usable credentials or provider.
    InvalidAuth,
    /// Transport or parse failure.
    Unknown,
}

/// A provider's reply to one user prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub message: String,
    pub error_type: ErrorType,
    /// Who the answer is attributed to in the transcript; empty means
    /// "use the host's profile name".
    pub attribution: String,
}

impl LlmResponse {
    pub fn new(message: impl Into<String>, error_type: ErrorType) -> Self {
        Self {
            message: message.into(),
            error_type,
            attribution: String::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ErrorType::None)
    }

    pub fn from_provider(message: impl Into<String>) -> Self {
        Self::new(message, ErrorType::FromProvider)
    }

    pub fn invalid_model() -> Self {
        Self::new(INVALID_MODEL_MESSAGE, ErrorType::InvalidModel)
    }

    pub fn invalid_auth(message: impl Into<String>) -> Self {
        Self::new(message, ErrorType::InvalidAuth)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(message, ErrorType::Unknown)
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.error_type != ErrorType::None
    }
}
