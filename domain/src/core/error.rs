//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid authentication values: {0}")]
    InvalidAuthValues(String),

    #[error("Unknown provider: {0} (expected azure, openai or github-copilot)")]
    InvalidProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_provider_display() {
        let error = DomainError::InvalidProvider("gemini".to_string());
        assert_eq!(
            error.to_string(),
            "Unknown provider: gemini (expected azure, openai or github-copilot)"
        );
    }
}
