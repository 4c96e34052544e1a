use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{ProgressEvent, ProgressSink};

/// Repository-level progress bar driven by batch events.
///
/// Hidden in quiet mode or when stderr is not a TTY. Failures are printed
/// above the bar so they stay visible after it clears.
#[derive(Clone)]
pub struct RepositoryProgress {
    progress_bar: ProgressBar,
}

impl RepositoryProgress {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        Self::new_with_visibility(quiet, is_tty)
    }

    fn new_with_visibility(quiet: bool, is_tty: bool) -> Self {
        let progress_bar = if quiet || !is_tty {
            ProgressBar::hidden()
        } else {
            Self::create_visible_progress_bar()
        };
        Self { progress_bar }
    }

    fn create_visible_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} repositories {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    #[must_use]
    pub fn length(&self) -> Option<u64> {
        self.progress_bar.length()
    }
}

impl ProgressSink for RepositoryProgress {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { total } => {
                self.progress_bar.set_length(total as u64);
            }
            ProgressEvent::Progress {
                repo, processed, ..
            } => {
                self.progress_bar
                    .set_position(processed.saturating_sub(1) as u64);
                self.progress_bar.set_message(repo);
            }
            ProgressEvent::Skipped { .. } => {}
            ProgressEvent::Failed { repo, message } => {
                self.progress_bar.println(format!("failed: {repo}: {message}"));
            }
            ProgressEvent::Finished => {
                if let Some(total) = self.progress_bar.length() {
                    self.progress_bar.set_position(total);
                }
                self.progress_bar.finish_and_clear();
            }
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
