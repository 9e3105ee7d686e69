//! Terminal context attached to prompts.

use serde::{Deserialize, Serialize};

/// Information about the active terminal pane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalContext {
    /// Command line of the shell running in the active pane (e.g. `pwsh.exe`).
    pub active_commandline: Option<String>,
}

impl TerminalContext {
    pub fn new(active_commandline: impl Into<String>) -> Self {
        let commandline = active_commandline.into();
        Self {
            active_commandline: (!commandline.trim().is_empty()).then_some(commandline),
        }
    }

    pub fn active_commandline(&self) -> Option<&str> {
        self.active_commandline
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }
}

/// Append the active shell to the user's prompt so the model answers for it.
pub fn engineer_prompt(prompt: &str, context: Option<&TerminalContext>) -> String {
    match context.and_then(TerminalContext::active_commandline) {
        Some(shell) => format!("{prompt}. The shell I am running is {shell}"),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_gets_shell_suffix() {
        let ctx = TerminalContext::new("pwsh.exe");
        assert_eq!(
            engineer_prompt("list files", Some(&ctx)),
            "list files. The shell I am running is pwsh.exe"
        );
    }

    #[test]
    fn test_prompt_unchanged_without_shell() {
        assert_eq!(engineer_prompt("list files", None), "list files");
        let empty = TerminalContext::new("  ");
        assert_eq!(empty.active_commandline, None);
        assert_eq!(engineer_prompt("list files", Some(&empty)), "list files");
    }
}
