//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over the chat palette.

mod repl;

pub use repl::ChatRepl;
