//! Presentation layer for terminal-chat
//!
//! This crate contains CLI definitions, transcript rendering,
//! progress reporters, host event handling and the interactive chat loop.

pub mod chat;
pub mod cli;
pub mod config;
pub mod host;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use config::{OutputConfig, ReplConfig};
pub use host::{DEFAULT_EXPORT_FILE, HostEventHandler, HostNotice};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
