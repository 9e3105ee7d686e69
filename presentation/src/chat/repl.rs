//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::host::{HostEventHandler, HostNotice};
use crate::{ConsoleFormatter, ProgressReporter, SimpleProgress};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io::IsTerminal;
use std::path::Path;
use termchat_application::{ChatPalette, CommandAction, HostEventReceiver};
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl {
    palette: ChatPalette,
    events: HostEventReceiver,
    host: HostEventHandler,
    formatter: ConsoleFormatter,
    config: ReplConfig,
}

impl ChatRepl {
    /// Create a REPL driving `palette`; `events` is the receiving end of the
    /// channel the palette and its provider report to.
    pub fn new(palette: ChatPalette, events: HostEventReceiver, host: HostEventHandler) -> Self {
        Self {
            palette,
            events,
            host,
            formatter: ConsoleFormatter::default(),
            config: ReplConfig::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: ConsoleFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.config.history_path() else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("History disabled: {}", e);
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("chat".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.palette.open();
        println!(
            "{}",
            ConsoleFormatter::welcome(&self.palette.branding(), self.palette.active_commandline())
        );
        self.print_notices();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.ask(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Send one question and print the answer
    pub async fn ask(&mut self, question: &str) {
        println!();

        let provider_name = self.palette.provider_name();
        let progress = if !self.config.show_progress {
            None
        } else if std::io::stderr().is_terminal() {
            Some(ProgressReporter::start(format!("Asking {}...", provider_name)))
        } else {
            SimpleProgress::waiting(&provider_name);
            None
        };
        let group = self.palette.submit_query(question).await.cloned();
        if let Some(progress) = progress {
            progress.clear();
        }

        if let Some(group) = group {
            let is_error = self
                .palette
                .last_response()
                .is_some_and(|response| response.is_error());
            print!("{}", self.formatter.format_response(&group, is_error));
        }
        println!();
        self.print_notices();
    }

    /// Write the transcript to `path` through the host
    pub fn export_to(&mut self, path: &Path) {
        self.host.set_export_path(path);
        if self.palette.export_messages().is_none() {
            println!("Nothing to export.");
        }
        self.print_notices();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match self.palette.handle_command(cmd) {
            CommandAction::Exit => {
                println!("Bye!");
                return true;
            }
            CommandAction::Help => println!("\n{}", ConsoleFormatter::help()),
            CommandAction::Cleared => println!("{}", "Conversation cleared.".dimmed()),
            CommandAction::Exported { path, .. } => match path {
                Some(path) => self.host.set_export_path(path),
                None => self.host.reset_export_path(),
            },
            CommandAction::NothingToExport => println!("Nothing to export yet."),
            CommandAction::ShellChanged(Some(shell)) => println!("Answers will target: {}", shell),
            CommandAction::ShellChanged(None) => println!("Shell cleared."),
            CommandAction::ProviderInfo(Some(branding)) => {
                println!("{} {}", "Provider:".cyan().bold(), branding.name);
                println!("{}", branding.subheader_text.dimmed());
            }
            CommandAction::ProviderInfo(None) => {
                println!("No provider configured. Type /setup for instructions.")
            }
            CommandAction::InvalidArgument(msg) => eprintln!("{}", msg.yellow()),
            CommandAction::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
            CommandAction::CommandSuggested(_)
            | CommandAction::SetUpProviderRequested => {}
        }
        self.print_notices();
        false
    }

    fn print_notices(&mut self) {
        for notice in self.host.drain(&mut self.events) {
            match notice {
                HostNotice::Warning(_) => eprintln!("{}", notice),
                _ => println!("{}", notice),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termchat_application::{ChatConfig, host_event_channel};

    fn quiet_repl(default_export: &Path) -> ChatRepl {
        let (tx, rx) = host_event_channel();
        let palette = ChatPalette::new(ChatConfig::default()).with_event_sender(tx);
        let host = HostEventHandler::new().with_export_path(default_export);
        ChatRepl::new(palette, rx, host).with_config(ReplConfig {
            show_progress: false,
            history_file: None,
        })
    }

    #[tokio::test]
    async fn test_bare_export_after_custom_path_uses_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("default.txt");
        let custom = dir.path().join("custom.txt");
        let mut repl = quiet_repl(&default);

        repl.ask("list files").await;
        assert!(!repl.handle_command(&format!("/export {}", custom.display())));
        assert!(custom.exists());
        assert!(!default.exists());

        assert!(!repl.handle_command("/export"));
        assert!(default.exists());
        assert_eq!(repl.host.export_path(), &default);
    }

    #[tokio::test]
    async fn test_export_to_writes_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("session.txt");
        let mut repl = quiet_repl(&dir.path().join("default.txt"));

        repl.ask("how do I list files").await;
        repl.export_to(&target);

        let text = std::fs::read_to_string(&target).unwrap();
        assert!(text.contains("how do I list files"));
    }

    #[test]
    fn test_quit_ends_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = quiet_repl(&dir.path().join("default.txt"));
        assert!(repl.handle_command("/quit"));
        assert!(!repl.handle_command("/nope"));
    }
}
