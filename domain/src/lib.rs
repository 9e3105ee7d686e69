//! Domain layer for terminal-chat
//!
//! This crate contains the entities, value objects and pure algorithms of the
//! terminal chat palette. It has no dependencies on HTTP, configuration files
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! Each provider owns a [`ConversationHistory`]: the role-tagged messages
//! sent to the model. It is append-only and reset when the chat is cleared.
//!
//! ## Transcript
//!
//! What the user sees. Every turn becomes a [`GroupedChatMessages`]; model
//! answers are split by [`segment_markdown`] into text and code fragments so
//! individual commands can be sent to the shell.
//!
//! ## Auth
//!
//! Token-based providers move through [`AuthState`] and report new tokens as
//! an [`AuthenticationResult`] for the host to persist.

pub mod auth;
pub mod chat;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod provider;
pub mod util;

// Re-export commonly used types
pub use auth::{AuthState, AuthValues, AuthenticationResult, TokenPair};
pub use chat::{
    command::commandline_from_code,
    entities::{ChatMessage, GroupedChatMessages},
    segment::segment_markdown,
    transcript::Transcript,
};
pub use conversation::{
    context::{TerminalContext, engineer_prompt},
    entities::{Message, Role},
    history::ConversationHistory,
    response::{
        ErrorType, INVALID_MODEL_MESSAGE, LlmResponse, MISSING_PROVIDER_MESSAGE,
        UNKNOWN_ERROR_MESSAGE,
    },
};
pub use core::error::DomainError;
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use provider::{BrandingData, ProviderKind, is_valid_azure_endpoint};
