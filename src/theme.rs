//! Token styling: ANSI escape tables and the theme mapping token kinds to
//! terminal styles.

use crate::highlight::{Token, TokenKind};

/// ANSI escape sequences used by the renderer.
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";

    pub const BRIGHT_BLACK: &str = "\x1b[90m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
}

/// Style applied to one token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// ANSI color sequence; empty means the terminal default.
    pub color: &'static str,
    pub bold: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        color: "",
        bold: false,
    };

    const fn color(color: &'static str) -> Style {
        Style { color, bold: false }
    }

    const fn bold(color: &'static str) -> Style {
        Style { color, bold: true }
    }

    pub fn is_plain(&self) -> bool {
        self.color.is_empty() && !self.bold
    }
}

/// Maps token kinds to terminal styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    keyword: Style,
    string: Style,
    number: Style,
    comment: Style,
    preprocessor: Style,
    punct: Style,
    heading: Style,
    list_marker: Style,
    quote: Style,
    code_fence: Style,
    link: Style,
    key: Style,
    literal: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default",
            keyword: Style::bold(ansi::BLUE),
            string: Style::color(ansi::YELLOW),
            number: Style::color(ansi::CYAN),
            comment: Style::color(ansi::DIM),
            preprocessor: Style::color(ansi::GREEN),
            punct: Style::bold(ansi::BRIGHT_RED),
            heading: Style::bold(ansi::BLUE),
            list_marker: Style::bold(ansi::GREEN),
            quote: Style::color(ansi::CYAN),
            code_fence: Style::bold(ansi::GREEN),
            link: Style::color(ansi::CYAN),
            key: Style::color(ansi::MAGENTA),
            literal: Style::bold(ansi::GREEN),
        }
    }
}

impl Theme {
    /// Vim-like dark theme selected by `--theme`.
    pub fn vim() -> Self {
        Self {
            name: "vim-dark",
            number: Style::color(ansi::MAGENTA),
            comment: Style::color(ansi::BRIGHT_BLACK),
            ..Self::default()
        }
    }

    pub fn style(&self, kind: TokenKind) -> Style {
        match kind {
            TokenKind::Text => Style::PLAIN,
            TokenKind::Keyword => self.keyword,
            TokenKind::Str => self.string,
            TokenKind::Number => self.number,
            TokenKind::Comment => self.comment,
            TokenKind::Preprocessor => self.preprocessor,
            TokenKind::Punct => self.punct,
            TokenKind::Heading => self.heading,
            TokenKind::ListMarker => self.list_marker,
            TokenKind::Quote => self.quote,
            TokenKind::CodeFence => self.code_fence,
            TokenKind::Bold => Style {
                color: "",
                bold: true,
            },
            TokenKind::Italic => Style::color(ansi::ITALIC),
            TokenKind::Link => self.link,
            TokenKind::Key => self.key,
            TokenKind::Literal => self.literal,
        }
    }

    /// Render a token stream to an ANSI-escaped line.
    pub fn render_line(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for token in tokens {
            let style = self.style(token.kind);
            if style.is_plain() {
                out.push_str(&token.text);
                continue;
            }
            out.push_str(style.color);
            if style.bold {
                out.push_str(ansi::BOLD);
            }
            out.push_str(&token.text);
            out.push_str(ansi::RESET);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{Token, TokenKind};

    #[test]
    fn test_plain_tokens_render_unchanged() {
        let theme = Theme::default();
        let tokens = vec![Token::new("just text", TokenKind::Text)];
        assert_eq!(theme.render_line(&tokens), "just text");
    }

    #[test]
    fn test_styled_token_wrapped_in_reset() {
        let theme = Theme::default();
        let tokens = vec![Token::new("return", TokenKind::Keyword)];
        let rendered = theme.render_line(&tokens);
        assert!(rendered.starts_with(ansi::BLUE));
        assert!(rendered.contains(ansi::BOLD));
        assert!(rendered.ends_with(ansi::RESET));
        assert!(rendered.contains("return"));
    }

    #[test]
    fn test_vim_theme_changes_number_style() {
        let default = Theme::default();
        let vim = Theme::vim();
        assert_ne!(
            default.style(TokenKind::Number),
            vim.style(TokenKind::Number)
        );
        assert_eq!(
            default.style(TokenKind::Keyword),
            vim.style(TokenKind::Keyword)
        );
    }
}
