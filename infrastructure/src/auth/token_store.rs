//! File-backed storage for the GitHub Copilot token pair.
//!
//! The file holds the same `{"access_token", "refresh_token"}` document the
//! provider accepts as credentials, so a stored pair can be handed straight
//! back to `set_authentication`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use termchat_application::{CredentialStore, CredentialStoreError};
use termchat_domain::TokenPair;
use thiserror::Error;
use tracing::debug;

const TOKEN_FILE_NAME: &str = "github-copilot-tokens.json";

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("token file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("token file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `token_file` if configured, otherwise `<data dir>/terminal-chat/…`.
    pub fn from_config(token_file: Option<&str>) -> Option<Self> {
        match token_file.filter(|p| !p.trim().is_empty()) {
            Some(path) => Some(Self::new(path)),
            None => crate::ConfigLoader::data_dir().map(|d| Self::new(d.join(TOKEN_FILE_NAME))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored pair, or `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Replace the stored pair.
    ///
    /// The pair is written to a sibling file created owner-only (0600 on unix)
    /// and renamed over the old one, so the tokens are never on disk with
    /// wider permissions.
    pub fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("tmp");
        if let Err(e) = write_private(&staging, tokens.to_json().as_bytes())
            .and_then(|()| fs::rename(&staging, &self.path))
        {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), "Saved GitHub Copilot tokens");
        Ok(())
    }
}

/// Create `path` afresh, readable by the owner only, and fill it.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    // A leftover from an interrupted save would make create_new fail.
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl CredentialStore for TokenStore {
    fn load(&self) -> Result<Option<TokenPair>, CredentialStoreError> {
        TokenStore::load(self).map_err(|e| CredentialStoreError(e.to_string()))
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), CredentialStoreError> {
        TokenStore::save(self, tokens).map_err(|e| CredentialStoreError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("tokens.json"));

        assert_eq!(store.load().unwrap(), None);

        let pair = TokenPair::new("ghu_a", "ghr_r");
        store.save(&pair).unwrap();
        assert_eq!(store.load().unwrap(), Some(pair));

        store.save(&TokenPair::new("ghu_b", "ghr_s")).unwrap();
        assert_eq!(
            store.load().unwrap().map(|p| p.access_token),
            Some("ghu_b".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        store.save(&TokenPair::new("a", "r")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            TokenStore::new(&path).load(),
            Err(TokenStoreError::Json(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_tightens_existing_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, TokenPair::new("old", "old").to_json()).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = TokenStore::new(&path);
        store.save(&TokenPair::new("ghu_new", "ghr_new")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some(TokenPair::new("ghu_new", "ghr_new")));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_replaces_stale_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(path.with_extension("tmp"), "partial").unwrap();

        let store = TokenStore::new(&path);
        store.save(&TokenPair::new("a", "r")).unwrap();

        assert_eq!(store.load().unwrap(), Some(TokenPair::new("a", "r")));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_works_through_the_port() {
        let dir = tempfile::tempdir().unwrap();
        let store: Box<dyn CredentialStore> =
            Box::new(TokenStore::new(dir.path().join("tokens.json")));

        store.save(&TokenPair::new("a", "r")).unwrap();
        assert_eq!(store.load().unwrap(), Some(TokenPair::new("a", "r")));
    }

    #[test]
    fn test_configured_path_wins() {
        let store = TokenStore::from_config(Some("/tmp/custom.json")).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/custom.json"));
    }
}
