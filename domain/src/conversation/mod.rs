//! Conversation domain.
//!
//! - [`entities::Message`]: a role-tagged entry sent to the model
//! - [`history::ConversationHistory`]: the append-only list a provider owns
//! - [`response::LlmResponse`]: a provider's reply, successful or not
//! - [`context::TerminalContext`]: what the terminal tells us about the shell

pub mod context;
pub mod entities;
pub mod history;
pub mod response;
