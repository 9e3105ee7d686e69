//! Port for persisting provider credentials between sessions.

use termchat_domain::TokenPair;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("credential store: {0}")]
pub struct CredentialStoreError(pub String);

/// Where the host keeps the token pair a provider reported.
pub trait CredentialStore: Send + Sync {
    /// The stored pair, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<TokenPair>, CredentialStoreError>;

    /// Replace the stored pair.
    fn save(&self, tokens: &TokenPair) -> Result<(), CredentialStoreError>;
}
