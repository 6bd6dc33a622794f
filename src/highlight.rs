use inksac::prelude::*;

/// Colours the front-end's own text. Falls back to plain text when the
/// terminal has no colour support.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return text.to_string();
        }
        text.style(style).to_string()
    }

    /// `dir > ` with the directory in bold cyan.
    pub fn highlight_prompt(&self, dir: &str) -> String {
        let dir_style = Style::builder().foreground(Color::Cyan).bold().build();
        format!("{} > ", self.paint(dir, dir_style))
    }

    pub fn highlight_error(&self, error: &str) -> String {
        let error_style = Style::builder().foreground(Color::Red).bold().build();
        self.paint(error, error_style)
    }

    /// Text external commands wrote to stderr.
    pub fn highlight_stderr(&self, stderr: &str) -> String {
        let stderr_style = Style::builder().foreground(Color::Yellow).build();
        self.paint(stderr, stderr_style)
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();
        self.paint(hint, hint_style)
    }
}
