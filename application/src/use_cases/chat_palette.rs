//! Chat palette use case.
//!
//! The palette is the controller behind the chat panel: it owns the displayed
//! [`Transcript`], forwards prompts to the active [`LlmProvider`], splits the
//! answer into text and code fragments, and raises [`HostEvent`]s for the
//! things only the host can do (persist tokens, save files, type into the
//! shell).
//!
//! One prompt is in flight at a time: `submit_query` borrows the palette
//! mutably until the provider has answered.

use crate::config::ChatConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::host_event::{HostEvent, HostEventSender, notify_host};
use crate::ports::llm_provider::LlmProvider;
use std::sync::Arc;
use termchat_domain::util::log_preview;
use termchat_domain::{
    BrandingData, ChatMessage, ErrorType, GroupedChatMessages, LlmResponse,
    MISSING_PROVIDER_MESSAGE, TerminalContext, Transcript, commandline_from_code,
    segment_markdown,
};
use tracing::{debug, info};

/// Result of handling a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// Leave the chat
    Exit,
    /// Show the command list
    Help,
    /// Transcript and provider history were reset
    Cleared,
    /// Transcript handed to the host, optionally with a target file
    Exported { text: String, path: Option<String> },
    /// `/export` with an empty transcript
    NothingToExport,
    /// A code block was turned into a shell input line
    CommandSuggested(String),
    /// Active shell changed (None = cleared)
    ShellChanged(Option<String>),
    /// Current provider branding (None when no provider is set)
    ProviderInfo(Option<BrandingData>),
    /// The user asked to configure a provider
    SetUpProviderRequested,
    /// Bad or missing argument; payload is the message to show
    InvalidArgument(String),
    /// Unrecognized command
    Unknown(String),
}

/// Controller for the chat palette
pub struct ChatPalette {
    provider: Option<Box<dyn LlmProvider>>,
    config: ChatConfig,
    transcript: Transcript,
    active_commandline: Option<String>,
    last_response: Option<LlmResponse>,
    /// Channel sender for host events
    events: Option<HostEventSender>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatPalette {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            provider: None,
            config,
            transcript: Transcript::new(),
            active_commandline: None,
            last_response: None,
            events: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Set the initial provider.
    pub fn with_provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.set_provider(Some(provider));
        self
    }

    /// Route host events into `tx`.
    pub fn with_event_sender(mut self, tx: HostEventSender) -> Self {
        self.events = Some(tx);
        self
    }

    /// Set a conversation logger for structured event logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Attribution for responses that carry none.
    pub fn with_profile_name(mut self, name: impl Into<String>) -> Self {
        self.config.profile_name = name.into();
        self
    }

    /// Set the active shell before the first query.
    pub fn with_active_commandline(mut self, commandline: impl Into<String>) -> Self {
        self.set_active_commandline(commandline);
        self
    }

    /// Replace the provider and start a fresh conversation with it.
    pub fn set_provider(&mut self, provider: Option<Box<dyn LlmProvider>>) {
        self.provider = provider;
        info!(provider = %self.provider_name(), "Chat provider set");
        self.clear_and_initialize();
        self.push_context();
    }

    pub fn provider_exists(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the connected provider, empty when there is none.
    pub fn provider_name(&self) -> String {
        self.provider
            .as_ref()
            .map(|p| p.branding().name)
            .unwrap_or_default()
    }

    /// Branding for the header; the built-in branding when no provider is set.
    pub fn branding(&self) -> BrandingData {
        self.provider
            .as_ref()
            .map(|p| p.branding())
            .unwrap_or_else(BrandingData::terminal_chat)
    }

    pub fn provider(&self) -> Option<&dyn LlmProvider> {
        self.provider.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn active_commandline(&self) -> Option<&str> {
        self.active_commandline.as_deref()
    }

    /// The most recent provider response, for error reporting.
    pub fn last_response(&self) -> Option<&LlmResponse> {
        self.last_response.as_ref()
    }

    /// Reset the transcript and re-prime the provider with the system prompt.
    pub fn clear_and_initialize(&mut self) {
        self.transcript.clear();
        self.last_response = None;
        if let Some(provider) = self.provider.as_mut() {
            provider.clear_message_history();
            provider.set_system_prompt(&self.config.system_prompt);
        }
        debug!("Chat transcript cleared");
    }

    /// The palette became visible: record it and refresh the provider's context.
    pub fn open(&mut self) {
        let provider_name = self.provider_name();
        info!(
            provider = %provider_name,
            provider_stored = self.provider_exists(),
            "Chat palette opened"
        );
        self.conversation_logger
            .log(ConversationEvent::PaletteOpened {
                provider_stored: self.provider_exists(),
                provider: provider_name,
            });
        self.push_context();
    }

    /// Record the shell running in the active pane and tell the provider.
    pub fn set_active_commandline(&mut self, commandline: impl Into<String>) {
        let commandline = commandline.into();
        self.active_commandline = (!commandline.trim().is_empty()).then_some(commandline);
        self.push_context();
    }

    fn push_context(&mut self) {
        let context = TerminalContext {
            active_commandline: self.active_commandline.clone(),
        };
        if let Some(provider) = self.provider.as_mut() {
            provider.set_context(context);
        }
    }

    fn current_time() -> String {
        chrono::Local::now().format("%H:%M").to_string()
    }

    /// Send `prompt` to the provider and append both sides to the transcript.
    ///
    /// Returns the response turn, or `None` for a blank prompt (nothing is
    /// sent or recorded).
    pub async fn submit_query(&mut self, prompt: &str) -> Option<&GroupedChatMessages> {
        if prompt.trim().is_empty() {
            return None;
        }

        let branding = self.provider.as_ref().map(|p| p.branding());
        let provider_name = branding.as_ref().map(|b| b.name.clone()).unwrap_or_default();
        let query_attribution = branding
            .as_ref()
            .map(|b| b.query_attribution.clone())
            .unwrap_or_default();

        self.transcript.append(GroupedChatMessages::new(
            Self::current_time(),
            true,
            vec![ChatMessage::query(prompt)],
            query_attribution,
        ));

        info!(provider = %provider_name, "AI query sent");
        self.conversation_logger.log(ConversationEvent::QuerySent {
            provider: provider_name.clone(),
            prompt: self.config.log_message_text.then(|| prompt.to_string()),
        });

        let response = match self.provider.as_mut() {
            Some(provider) => provider.get_response(prompt).await,
            None => LlmResponse::invalid_auth(MISSING_PROVIDER_MESSAGE),
        };

        self.add_response_to_transcript(response, branding.as_ref(), &provider_name);
        self.transcript.last()
    }

    fn add_response_to_transcript(
        &mut self,
        response: LlmResponse,
        branding: Option<&BrandingData>,
        provider_name: &str,
    ) {
        let fragments = if response.is_error() {
            vec![ChatMessage::text(response.message.clone())]
        } else {
            let segmented = segment_markdown(&response.message);
            if segmented.is_empty() {
                vec![ChatMessage::text(response.message.clone())]
            } else {
                segmented
            }
        };

        let attribution = if response.attribution.is_empty() {
            self.config.profile_name.clone()
        } else {
            response.attribution.clone()
        };
        let badge = branding
            .map(|b| b.badge_icon_path.clone())
            .unwrap_or_default();

        let from_ai = response.error_type == ErrorType::None;
        info!(
            provider = %provider_name,
            from_ai,
            error_type = ?response.error_type,
            fragments = fragments.len(),
            "AI response received"
        );
        debug!("Response: {}", log_preview(&response.message, 200));
        self.conversation_logger
            .log(ConversationEvent::ResponseReceived {
                provider: provider_name.to_string(),
                from_ai,
                error_type: response.error_type,
                text: self
                    .config
                    .log_message_text
                    .then(|| response.message.clone()),
            });

        self.transcript.append(
            GroupedChatMessages::new(Self::current_time(), false, fragments, attribution)
                .with_badge(badge),
        );
        self.last_response = Some(response);
    }

    /// Export the transcript as plain text and hand it to the host.
    ///
    /// Returns `None` (and raises nothing) when the transcript is empty.
    pub fn export_messages(&self) -> Option<String> {
        let text = self.transcript.export_text();
        if text.is_empty() {
            return None;
        }
        self.conversation_logger
            .log(ConversationEvent::HistoryExported {
                turns: self.transcript.len(),
            });
        notify_host(
            self.events.as_ref(),
            HostEvent::ExportChatHistoryRequested(text.clone()),
        );
        Some(text)
    }

    /// Turn a suggested code block into one shell line and ask the host to
    /// type it into the active pane.
    pub fn run_command(&self, code: &str) -> String {
        let commandline = commandline_from_code(code, self.active_commandline());
        info!(provider = %self.provider_name(), "AI code response inputted");
        self.conversation_logger
            .log(ConversationEvent::CodeResponseInputted {
                provider: self.provider_name(),
            });
        notify_host(
            self.events.as_ref(),
            HostEvent::InputSuggestionRequested(commandline.clone()),
        );
        commandline
    }

    /// The `index`-th (1-based) code block of the latest response.
    pub fn code_block(&self, index: usize) -> Option<&str> {
        let response = self.transcript.groups().iter().rev().find(|g| !g.is_query)?;
        response
            .code_blocks()
            .nth(index.checked_sub(1)?)
            .map(ChatMessage::content)
    }

    /// Ask the host to open provider setup.
    pub fn request_provider_setup(&self) {
        notify_host(self.events.as_ref(), HostEvent::SetUpProviderRequested);
    }

    /// Handle a slash command typed into the palette.
    pub fn handle_command(&mut self, cmd: &str) -> CommandAction {
        let parts: Vec<&str> = cmd.trim().splitn(2, ' ').collect();
        let command = parts.first().copied().unwrap_or("");
        let args = parts.get(1).copied().unwrap_or("").trim();

        match command {
            "/quit" | "/exit" | "/q" => CommandAction::Exit,
            "/help" | "/h" | "/?" => CommandAction::Help,
            "/clear" => {
                self.clear_and_initialize();
                CommandAction::Cleared
            }
            "/export" => match self.export_messages() {
                Some(text) => CommandAction::Exported {
                    text,
                    path: (!args.is_empty()).then(|| args.to_string()),
                },
                None => CommandAction::NothingToExport,
            },
            "/run" => {
                let index = if args.is_empty() {
                    Ok(1)
                } else {
                    args.parse::<usize>()
                };
                match index {
                    Ok(n) => match self.code_block(n).map(str::to_string) {
                        Some(code) => CommandAction::CommandSuggested(self.run_command(&code)),
                        None => CommandAction::InvalidArgument(format!(
                            "No code block #{} in the last response",
                            n
                        )),
                    },
                    Err(_) => CommandAction::InvalidArgument(format!(
                        "Usage: /run <n> (got '{}')",
                        args
                    )),
                }
            }
            "/shell" => {
                self.set_active_commandline(args);
                CommandAction::ShellChanged(self.active_commandline.clone())
            }
            "/provider" => {
                CommandAction::ProviderInfo(self.provider.as_ref().map(|p| p.branding()))
            }
            "/setup" => {
                self.request_provider_setup();
                CommandAction::SetUpProviderRequested
            }
            other => CommandAction::Unknown(other.to_string()),
        }
    }
}
