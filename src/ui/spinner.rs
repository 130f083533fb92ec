//! Progress spinner shown while the generation service works.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::{CodeflowTheme, Tone};
use super::SpinnerHandle;

pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: CodeflowTheme,
}

impl ProgressSpinner {
    pub fn new(message: &str, theme: CodeflowTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar, theme }
    }

    /// A spinner that draws nothing, used in quiet mode.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: CodeflowTheme::plain(),
        }
    }

    fn finish(&mut self, tone: Tone, msg: &str) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(self.theme.status(tone, msg));
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.finish(Tone::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(Tone::Error, msg);
    }
}
