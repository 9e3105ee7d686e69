//! Console rendering of the chat transcript

use crate::config::OutputConfig;
use colored::Colorize;
use termchat_domain::{BrandingData, GroupedChatMessages};

/// Formats transcript turns for the terminal.
///
/// Code fragments are numbered per turn so `/run <n>` can refer to them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleFormatter {
    config: OutputConfig,
}

impl ConsoleFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Format one transcript turn
    pub fn format_group(&self, group: &GroupedChatMessages) -> String {
        let mut output = String::new();

        if self.config.show_metadata {
            let label = if group.attribution.is_empty() {
                if group.is_query { "You" } else { "Assistant" }
            } else {
                group.attribution.as_str()
            };
            let header = format!("{} · {}", label, group.time);
            let header = if group.is_query {
                header.cyan().bold()
            } else {
                header.yellow().bold()
            };
            output.push_str(&format!("{}\n", header));
        }

        let mut code_index = 0;
        for message in &group.messages {
            if message.is_code() {
                code_index += 1;
                output.push_str(&Self::code_block(code_index, message.content()));
            } else {
                output.push_str(message.content());
                output.push('\n');
            }
        }

        output
    }

    /// Format a response turn, marking it when it describes a failure
    pub fn format_response(&self, group: &GroupedChatMessages, is_error: bool) -> String {
        if !is_error {
            return self.format_group(group);
        }

        let body = group
            .messages
            .iter()
            .map(|m| m.content())
            .collect::<Vec<_>>()
            .join("\n");
        let mut output = String::new();
        if self.config.show_metadata {
            output.push_str(&format!(
                "{}\n",
                format!("{} · {}", group.attribution, group.time).red().bold()
            ));
        }
        output.push_str(&format!("{} {}\n", "Error:".red().bold(), body));
        output
    }

    fn code_block(index: usize, code: &str) -> String {
        let rule = "─".repeat(40);
        format!(
            "{} {}\n{}\n{}\n",
            format!("[{}]", index).green().bold(),
            rule.dimmed(),
            Self::indent(code, "  "),
            format!("    {}", rule).dimmed(),
        )
    }

    /// Header shown when the chat starts
    pub fn welcome(branding: &BrandingData, active_shell: Option<&str>) -> String {
        let line = "─".repeat(45);
        let mut output = format!(
            "\n{}\n{:^45}\n{}\n",
            line.cyan(),
            branding.header_text.bold(),
            line.cyan()
        );
        if !branding.subheader_text.is_empty() {
            output.push_str(&format!("{}\n", branding.subheader_text.dimmed()));
        }
        if !branding.name.is_empty() {
            output.push_str(&format!("{} {}\n", "Provider:".cyan().bold(), branding.name));
        }
        if let Some(shell) = active_shell {
            output.push_str(&format!("{} {}\n", "Shell:".cyan().bold(), shell));
        }
        output.push('\n');
        output.push_str(&Self::help());
        output
    }

    pub fn help() -> String {
        [
            "Commands:",
            "  /help, /h, /?      - Show this help",
            "  /run [n]           - Send code block n of the last answer to the shell",
            "  /shell <cmdline>   - Set the shell the answers should target",
            "  /export [path]     - Save the transcript as text",
            "  /clear             - Start a new conversation",
            "  /provider          - Show the active provider",
            "  /setup             - How to configure a provider",
            "  /quit, /exit, /q   - Exit chat",
            "",
        ]
        .join("\n")
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
