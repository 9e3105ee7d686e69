//! Chat transcript domain.
//!
//! - [`entities::ChatMessage`]: a text or code fragment of one turn
//! - [`entities::GroupedChatMessages`]: one turn with its attribution
//! - [`transcript::Transcript`]: the displayed list of turns
//! - [`segment::segment_markdown`]: splits a response at fenced code blocks
//! - [`command::commandline_from_code`]: code block → shell input line

pub mod command;
pub mod entities;
pub mod segment;
pub mod transcript;
