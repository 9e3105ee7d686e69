//! Events raised towards the hosting shell.
//!
//! The palette and the providers never call back into the host directly;
//! they push a [`HostEvent`] into an unbounded channel and the host drains it
//! on its own task (persisting tokens, writing exported files, typing a
//! suggested command into the active shell).

use termchat_domain::AuthenticationResult;
use tokio::sync::mpsc;

/// Notifications for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A provider obtained new tokens (persist them) or failed to sign in.
    AuthChanged(AuthenticationResult),
    /// The user asked to save the transcript; payload is the exported text.
    ExportChatHistoryRequested(String),
    /// The user picked a suggested command; payload is the shell input line.
    InputSuggestionRequested(String),
    /// The user wants to configure a provider.
    SetUpProviderRequested,
}

pub type HostEventSender = mpsc::UnboundedSender<HostEvent>;
pub type HostEventReceiver = mpsc::UnboundedReceiver<HostEvent>;

pub fn host_event_channel() -> (HostEventSender, HostEventReceiver) {
    mpsc::unbounded_channel()
}

/// Send `event` if anyone is listening. A closed or missing channel is not
/// an error: the host may have gone away while a request was in flight.
pub fn notify_host(sender: Option<&HostEventSender>, event: HostEvent) {
    if let Some(tx) = sender {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_delivers_in_order() {
        let (tx, mut rx) = host_event_channel();
        notify_host(Some(&tx), HostEvent::SetUpProviderRequested);
        notify_host(Some(&tx), HostEvent::InputSuggestionRequested("ls".into()));

        assert_eq!(rx.try_recv().unwrap(), HostEvent::SetUpProviderRequested);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::InputSuggestionRequested("ls".into())
        );
    }

    #[test]
    fn test_notify_ignores_closed_channel() {
        let (tx, rx) = host_event_channel();
        drop(rx);
        notify_host(Some(&tx), HostEvent::SetUpProviderRequested);
        notify_host(None, HostEvent::SetUpProviderRequested);
    }
}
