//! Host side of the palette's event channel
//!
//! Drains [`HostEvent`]s raised by the palette and the providers and carries
//! them out in the terminal: storing tokens, writing exports, showing the
//! command the user picked.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use termchat_application::{CredentialStore, HostEvent, HostEventReceiver};
use tracing::{info, warn};

/// Default file for `/export` without a path.
pub const DEFAULT_EXPORT_FILE: &str = "terminal-chat-export.txt";

/// What the REPL should show after handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNotice {
    Info(String),
    Warning(String),
    /// A shell line ready to paste
    Suggestion(String),
}

impl fmt::Display for HostNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostNotice::Info(msg) => write!(f, "{}", msg.dimmed()),
            HostNotice::Warning(msg) => write!(f, "{} {}", "Warning:".yellow().bold(), msg),
            HostNotice::Suggestion(line) => {
                write!(f, "{}\n  {}", "Run in your shell:".cyan().bold(), line.bold())
            }
        }
    }
}

/// Executes host events on behalf of the terminal session
pub struct HostEventHandler {
    credentials: Option<Arc<dyn CredentialStore>>,
    default_export_path: PathBuf,
    export_path: PathBuf,
}

impl Default for HostEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEventHandler {
    pub fn new() -> Self {
        Self {
            credentials: None,
            default_export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }

    /// Persist tokens reported by providers into `store`
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// File used by exports that name no path
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_export_path = path.into();
        self.export_path = self.default_export_path.clone();
        self
    }

    /// Target of the next export
    pub fn set_export_path(&mut self, path: impl Into<PathBuf>) {
        self.export_path = path.into();
    }

    /// Point exports back at the default file
    pub fn reset_export_path(&mut self) {
        self.export_path = self.default_export_path.clone();
    }

    pub fn export_path(&self) -> &PathBuf {
        &self.export_path
    }

    /// Carry out one event
    pub fn handle(&self, event: HostEvent) -> HostNotice {
        match event {
            HostEvent::AuthChanged(result) => match (result.tokens, result.error_message) {
                (Some(tokens), _) => match &self.credentials {
                    Some(store) => match store.save(&tokens) {
                        Ok(()) => {
                            info!("Stored refreshed provider tokens");
                            HostNotice::Info("Signed in; tokens saved".to_string())
                        }
                        Err(e) => {
                            warn!("Failed to store tokens: {}", e);
                            HostNotice::Warning(format!("Signed in, but {}", e))
                        }
                    },
                    None => HostNotice::Info("Signed in".to_string()),
                },
                (None, Some(message)) => HostNotice::Warning(message),
                (None, None) => HostNotice::Warning("Authentication failed".to_string()),
            },
            HostEvent::ExportChatHistoryRequested(text) => {
                match std::fs::write(&self.export_path, text) {
                    Ok(()) => {
                        info!(path = %self.export_path.display(), "Transcript exported");
                        HostNotice::Info(format!(
                            "Transcript saved to {}",
                            self.export_path.display()
                        ))
                    }
                    Err(e) => {
                        warn!("Export failed: {}", e);
                        HostNotice::Warning(format!(
                            "Could not write {}: {}",
                            self.export_path.display(),
                            e
                        ))
                    }
                }
            }
            HostEvent::InputSuggestionRequested(line) => HostNotice::Suggestion(line),
            HostEvent::SetUpProviderRequested => HostNotice::Info(setup_hint()),
        }
    }

    /// Handle every event queued so far
    pub fn drain(&self, rx: &mut HostEventReceiver) -> Vec<HostNotice> {
        let mut notices = Vec::new();
        while let Ok(event) = rx.try_recv() {
            notices.push(self.handle(event));
        }
        notices
    }
}

fn setup_hint() -> String {
    [
        "Configure a provider in ~/.config/terminal-chat/config.toml, e.g.",
        "  [providers]",
        "  default = \"openai\"",
        "  [providers.openai]",
        "  api_key_env = \"OPENAI_API_KEY\"",
        "For GitHub Copilot set providers.github_copilot.client_id and run --login.",
    ]
    .join("\n")
}
