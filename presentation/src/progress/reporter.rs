//! Spinner shown while a provider request is in flight

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Reports progress while waiting for a provider with a spinner
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Start spinning with `message`
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Stop and erase the spinner line
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

/// One-line notice instead of a spinner when stderr is not a terminal
pub struct SimpleProgress;

impl SimpleProgress {
    pub fn waiting(provider: &str) {
        eprintln!("{} Asking {}...", "->".cyan(), provider);
    }
}
