//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// conversation_log = "~/.local/share/terminal-chat/chat.jsonl"
/// log_message_text = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving palette events (disabled when unset)
    pub conversation_log: Option<String>,
    /// Write prompt and response text into `conversation_log` records.
    /// Off by default: records then carry provider and outcome only.
    pub log_message_text: bool,
    /// Directory for the daily diagnostic log (stderr only when unset)
    pub file_dir: Option<String>,
}
