//! Terminal styling.

use console::{Style, Term};

/// Kind of a one-line status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    pub fn glyph(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Warning => "⚠",
            Tone::Error => "✗",
        }
    }
}

/// Styles for status lines, headers and framed code.
///
/// [`plain`](Self::plain) renders the same text without escape codes.
#[derive(Debug, Clone)]
pub struct CodeflowTheme {
    success: Style,
    warning: Style,
    error: Style,
    accent: Style,
    frame: Style,
}

impl CodeflowTheme {
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            accent: Style::new().cyan().bold(),
            frame: Style::new().dim(),
        }
    }

    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            accent: Style::new(),
            frame: Style::new(),
        }
    }

    /// Colored when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_none() && Term::stdout().is_term() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn status(&self, tone: Tone, msg: &str) -> String {
        let style = match tone {
            Tone::Success => &self.success,
            Tone::Warning => &self.warning,
            Tone::Error => &self.error,
        };
        style
            .apply_to(format!("{} {}", tone.glyph(), msg))
            .to_string()
    }

    pub fn header(&self, title: &str) -> String {
        self.accent.apply_to(format!("◆ {}", title)).to_string()
    }

    /// Frame `code` with a left rule so it stands apart from status lines.
    pub fn code_frame(&self, code: &str) -> String {
        let rule = |s: &str| self.frame.apply_to(s.to_string()).to_string();
        let mut lines = vec![rule("┌────")];
        lines.extend(code.lines().map(|line| format!("{} {}", rule("│"), line)));
        lines.push(rule("└────"));
        lines.join("\n")
    }
}
