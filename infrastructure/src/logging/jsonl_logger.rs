//! JSONL sink for palette events.
//!
//! Records are appended one per line as `{"timestamp": ..., "type": ..., <fields>}`
//! so a log can span several sessions.

use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use termchat_application::{ConversationEvent, ConversationLogger};
use tracing::warn;

#[derive(Serialize)]
struct LogRecord<'a> {
    timestamp: String,
    #[serde(flatten)]
    event: &'a ConversationEvent,
}

/// Appends [`ConversationEvent`]s to a JSONL file, flushing after each record.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating parent directories as needed.
    ///
    /// Returns `None` (after a warning) when the file cannot be opened; the
    /// chat then runs without a conversation log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match open_append(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!(path = %path.display(), "Conversation log disabled: {}", e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let record = LogRecord {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event: &event,
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!(event = event.kind(), "Dropping conversation log record: {}", e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|()| writer.flush())
        {
            warn!("Could not write {}: {}", self.path.display(), e);
        }
    }
}
