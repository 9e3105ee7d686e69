//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use termchat_domain::ProviderKind;

/// CLI arguments for terminal-chat
#[derive(Parser, Debug)]
#[command(name = "terminal-chat")]
#[command(author, version, about = "Ask an AI provider about shell commands from your terminal")]
#[command(long_about = r#"
Terminal Chat sends natural-language questions about shell commands to an AI
provider (Azure OpenAI, OpenAI or GitHub Copilot) and splits the answer into
text and runnable code blocks.

Configuration files are loaded from (in priority order):
1. TERMINAL_CHAT_<SECTION>__<KEY>   Environment variables
2. --config <path>                  Explicit config file
3. ./terminal-chat.toml             Project-level config
4. ~/.config/terminal-chat/config.toml   Global config

Example:
  terminal-chat "how do I list files sorted by size?"
  terminal-chat --provider openai --shell pwsh "find large files"
  terminal-chat --provider github-copilot --login
  terminal-chat --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub prompt: Option<String>,

    /// Provider to use: azure, openai or github-copilot (overrides providers.default)
    #[arg(short, long, value_name = "PROVIDER", value_parser = ProviderKind::from_str)]
    pub provider: Option<ProviderKind>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Shell the answers should target, e.g. "pwsh" or "bash"
    #[arg(short, long, value_name = "CMDLINE")]
    pub shell: Option<String>,

    /// Sign in to GitHub Copilot and store the tokens
    #[arg(long)]
    pub login: bool,

    /// Write the transcript to PATH when the session ends
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_one_shot_question() {
        let cli = Cli::try_parse_from(["terminal-chat", "-p", "copilot", "-s", "zsh", "list files"])
            .unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("list files"));
        assert_eq!(cli.provider, Some(ProviderKind::GithubCopilot));
        assert_eq!(cli.shell.as_deref(), Some("zsh"));
        assert!(!cli.chat);
    }

    #[test]
    fn test_rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["terminal-chat", "--provider", "bard", "hi"]).is_err());
    }

    #[test]
    fn test_counts_verbosity() {
        let cli = Cli::try_parse_from(["terminal-chat", "-vv", "--chat"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.chat);
        assert!(cli.prompt.is_none());
    }
}
