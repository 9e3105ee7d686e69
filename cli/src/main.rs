//! CLI entrypoint for Terminal Chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use termchat_application::{
    ChatPalette, ConversationLogger, CredentialStore, HostEventReceiver, HostEventSender,
    LlmProvider, host_event_channel,
};
use termchat_domain::{AuthValues, ProviderKind};
use termchat_infrastructure::{
    ConfigLoader, FileConfig, GithubCopilotProvider, JsonlConversationLogger, Severity,
    TokenStore, build_provider, github_copilot_settings,
};
use termchat_presentation::{
    ChatRepl, Cli, ConsoleFormatter, HostEventHandler, OutputConfig, ReplConfig,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file_dir.as_deref());
    info!("Starting Terminal Chat");

    for issue in config.validate() {
        match issue.severity {
            Severity::Error => eprintln!("Config error: {}", issue),
            Severity::Warning => eprintln!("Config warning: {}", issue),
        }
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let token_store = TokenStore::from_config(config.providers.github_copilot.token_file.as_deref())
        .map(Arc::new);
    let (tx, rx) = host_event_channel();
    let mut host = HostEventHandler::new();
    if let Some(store) = &token_store {
        host = host.with_credential_store(store.clone());
    }

    if cli.login {
        return login(&config, tx, rx, host).await;
    }

    let kind = match cli.provider {
        Some(kind) => Some(kind),
        None => config.providers.default_kind()?,
    };
    let provider = match kind {
        Some(kind) => create_provider(kind, &config, token_store.as_deref(), tx.clone()).await,
        None => None,
    };

    let conversation_logger: Option<Arc<dyn ConversationLogger>> = config
        .logging
        .conversation_log
        .as_deref()
        .and_then(JsonlConversationLogger::new)
        .map(|logger| Arc::new(logger) as Arc<dyn ConversationLogger>);

    let chat_config = config
        .chat
        .to_chat_config()
        .with_message_text_logging(config.logging.log_message_text);
    let mut palette = ChatPalette::new(chat_config).with_event_sender(tx);
    if let Some(logger) = conversation_logger {
        palette = palette.with_conversation_logger(logger);
    }
    if let Some(provider) = provider {
        palette = palette.with_provider(provider);
    }
    if let Some(shell) = cli.shell.as_ref().or(config.chat.shell.as_ref()) {
        palette = palette.with_active_commandline(shell.clone());
    }

    let mut repl = ChatRepl::new(palette, rx, host)
        .with_formatter(ConsoleFormatter::new(OutputConfig {
            color: config.output.color,
            show_metadata: config.output.show_metadata,
        }))
        .with_config(ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.clone(),
        });

    if cli.chat {
        repl.run().await?;
    } else {
        let prompt = match cli.prompt.as_deref() {
            Some(p) => p,
            None => bail!("A question is required. Use --chat for interactive mode."),
        };
        repl.ask(prompt).await;
    }

    if let Some(path) = &cli.export {
        repl.export_to(path);
    }

    Ok(())
}

/// Build the provider, reporting configuration problems instead of failing:
/// the palette answers with a setup hint when it has no provider.
async fn create_provider(
    kind: ProviderKind,
    config: &FileConfig,
    token_store: Option<&TokenStore>,
    events: HostEventSender,
) -> Option<Box<dyn LlmProvider>> {
    let stored_tokens = if kind == ProviderKind::GithubCopilot {
        token_store.and_then(|store| match CredentialStore::load(store) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Ignoring stored tokens: {}", e);
                None
            }
        })
    } else {
        None
    };

    match build_provider(kind, &config.providers, stored_tokens, Some(events)).await {
        Ok(provider) => Some(provider),
        Err(e) => {
            eprintln!("{} is not usable: {}", kind.display_name(), e);
            None
        }
    }
}

/// Run the GitHub sign-in: print the authorize URL, read back the redirect
/// URL and let the host store the resulting tokens.
async fn login(
    config: &FileConfig,
    tx: HostEventSender,
    mut rx: HostEventReceiver,
    host: HostEventHandler,
) -> Result<()> {
    let settings = github_copilot_settings(&config.providers)?;
    let mut provider = GithubCopilotProvider::new(settings)?.with_event_sender(tx);

    let state = uuid::Uuid::new_v4().to_string();
    println!("Open this URL in your browser and authorize the app:\n");
    println!("  {}\n", provider.authorize_url(&state)?);
    println!("Then paste the URL you were redirected to:");

    let mut redirect = String::new();
    std::io::stdin()
        .read_line(&mut redirect)
        .context("Failed to read the redirect URL")?;

    provider
        .set_authentication(&AuthValues::redirect(redirect.trim(), state).to_json())
        .await;

    for notice in host.drain(&mut rx) {
        println!("{}", notice);
    }

    if !provider.auth_state().is_authenticated() {
        bail!("GitHub sign-in failed");
    }
    if let Some(name) = provider.username() {
        println!("Signed in as {}", name);
    }
    Ok(())
}

/// Stderr logging filtered by `-v` (or `RUST_LOG` when no flag is given),
/// plus a daily rolling file when `file_dir` is set.
fn init_logging(verbose: u8, file_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match file_dir.map(Path::new) {
        Some(dir) => {
            if let Err(err) = std::fs::create_dir_all(dir) {
                eprintln!("failed to create log dir `{}`: {err}", dir.display());
            }
            let appender = tracing_appender::rolling::daily(dir, "terminal-chat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
