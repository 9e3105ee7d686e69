//! Application layer for terminal-chat
//!
//! This crate contains the chat palette use case, the ports provider and
//! host adapters implement, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    credential_store::{CredentialStore, CredentialStoreError},
    host_event::{HostEvent, HostEventReceiver, HostEventSender, host_event_channel, notify_host},
    llm_provider::{LlmProvider, ProviderError},
};
pub use use_cases::chat_palette::{ChatPalette, CommandAction};
