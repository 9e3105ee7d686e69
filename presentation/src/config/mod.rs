//! Presentation-level configuration
//!
//! Configuration for transcript rendering and REPL behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Print attribution and time above each turn
    pub show_metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_metadata: true,
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Show a spinner while waiting for a response
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// The configured history file with `~/` expanded, or the default under
    /// the data directory.
    pub fn history_path(&self) -> Option<PathBuf> {
        match self.history_file.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(path) => Some(expand_home(path)),
            None => dirs::data_dir().map(|d| d.join("terminal-chat").join("history.txt")),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_path_is_used() {
        let config = ReplConfig {
            history_file: Some("/tmp/chat-history.txt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/chat-history.txt"))
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = ReplConfig {
            history_file: Some("~/h.txt".to_string()),
            ..Default::default()
        };
        let path = config.history_path().unwrap();
        assert!(path.ends_with("h.txt"));
        if dirs::home_dir().is_some() {
            assert!(!path.starts_with("~"));
        }
    }
}
