//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording chat palette
//! activity as machine-readable records.
//!
//! `tracing` carries the human-readable diagnostics; this port carries the
//! usage events the terminal host used to send as telemetry.

use serde::Serialize;
use termchat_domain::ErrorType;

/// One palette event. Serializes with a snake_case `type` tag next to the
/// variant's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    PaletteOpened {
        provider_stored: bool,
        provider: String,
    },
    /// `prompt` is only filled in when message text logging is enabled
    QuerySent {
        provider: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },
    ResponseReceived {
        provider: String,
        from_ai: bool,
        error_type: ErrorType,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    HistoryExported {
        turns: usize,
    },
    CodeResponseInputted {
        provider: String,
    },
}

impl ConversationEvent {
    /// Tag written to the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversationEvent::PaletteOpened { .. } => "palette_opened",
            ConversationEvent::QuerySent { .. } => "query_sent",
            ConversationEvent::ResponseReceived { .. } => "response_received",
            ConversationEvent::HistoryExported { .. } => "history_exported",
            ConversationEvent::CodeResponseInputted { .. } => "code_response_inputted",
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible; a logging failure must never
/// interrupt the chat.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ConversationEvent::ResponseReceived {
            provider: "OpenAI".to_string(),
            from_ai: false,
            error_type: ErrorType::InvalidAuth,
            text: None,
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], event.kind());
        assert_eq!(value["error_type"], "invalid_auth");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_prompt_is_written_when_present() {
        let event = ConversationEvent::QuerySent {
            provider: "OpenAI".to_string(),
            prompt: Some("list files".to_string()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "query_sent");
        assert_eq!(value["prompt"], "list files");
    }
}
