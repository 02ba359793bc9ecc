//! Per-language line tokenizers.
//!
//! Each tokenizer makes a single pass over one line and splits it into styled
//! spans. This is deliberately lightweight: no grammar, no cross-line state
//! beyond what a line itself carries, just the handful of patterns that make
//! code readable in a terminal. Colors are assigned by the [`crate::theme`]
//! module, not here.

use std::path::Path;

/// Token classes produced by the tokenizers; the theme maps them to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Keyword,
    Str,
    Number,
    Comment,
    Preprocessor,
    /// Structural punctuation: JSON brackets, markdown table pipes
    Punct,
    Heading,
    ListMarker,
    Quote,
    CodeFence,
    Bold,
    Italic,
    Link,
    /// JSON object key
    Key,
    /// true/false/null
    Literal,
}

/// One styled span of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Supported languages. CSV carries no per-line highlighting; it exists so
/// the driver can route `.csv` files to the table formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    C,
    Python,
    Markdown,
    Json,
    Csv,
}

const C_EXTENSIONS: &[&str] = &["c", "h", "cpp", "hpp", "cxx", "hxx", "cc", "hh"];

const C_KEYWORDS: &[&str] = &[
    "int", "long", "short", "float", "double", "char", "void", "bool", "auto", "const", "static",
    "extern", "struct", "class", "enum", "union", "public", "private", "protected", "virtual",
    "override", "final", "inline", "constexpr", "mutable", "sizeof", "typedef", "namespace",
    "template", "typename", "using", "delete", "noexcept", "static_assert", "decltype", "return",
    "if", "else", "for", "while", "do", "switch", "case", "break", "continue", "new", "this",
    "try", "catch", "throw", "nullptr", "true", "false", "NULL", "explicit",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "class", "if", "elif", "else", "while", "for", "in", "try", "except", "finally",
    "with", "as", "import", "from", "return", "yield", "raise", "pass", "break", "continue",
    "lambda", "and", "or", "not", "is", "global", "nonlocal", "assert", "del", "async", "await",
    "True", "False", "None",
];

const C_PREPROCESSOR_DIRECTIVES: &[&str] = &[
    "#include", "#define", "#ifdef", "#ifndef", "#endif", "#else", "#elif", "#pragma",
];

impl Syntax {
    /// Resolve an explicit `--syntax` name, accepting the common short forms.
    pub fn from_name(name: &str) -> Option<Syntax> {
        match name.to_ascii_lowercase().as_str() {
            "c" | "cpp" | "c++" | "cxx" => Some(Syntax::C),
            "py" | "python" => Some(Syntax::Python),
            "md" | "markdown" => Some(Syntax::Markdown),
            "json" => Some(Syntax::Json),
            "csv" | "tsv" => Some(Syntax::Csv),
            _ => None,
        }
    }

    /// Detect a language from the file extension.
    pub fn detect(path: &Path) -> Option<Syntax> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyw" => Some(Syntax::Python),
            "md" | "markdown" => Some(Syntax::Markdown),
            "json" => Some(Syntax::Json),
            "csv" | "tsv" => Some(Syntax::Csv),
            _ if C_EXTENSIONS.contains(&ext.as_str()) => Some(Syntax::C),
            _ => None,
        }
    }

    /// Tokenize one line. Always returns at least one token covering the
    /// whole line.
    pub fn highlight_line(&self, line: &str) -> Vec<Token> {
        match self {
            Syntax::C => highlight_c(line),
            Syntax::Python => highlight_python(line),
            Syntax::Markdown => highlight_markdown(line),
            Syntax::Json => highlight_json(line),
            Syntax::Csv => vec![Token::new(line, TokenKind::Text)],
        }
    }
}

/// Accumulates tokens, merging adjacent plain-text spans.
#[derive(Default)]
struct TokenBuilder {
    tokens: Vec<Token>,
    plain: String,
}

impl TokenBuilder {
    fn text(&mut self, s: &str) {
        self.plain.push_str(s);
    }

    fn token(&mut self, s: &str, kind: TokenKind) {
        if kind == TokenKind::Text {
            self.text(s);
            return;
        }
        self.flush_plain();
        self.tokens.push(Token::new(s, kind));
    }

    fn flush_plain(&mut self) {
        if !self.plain.is_empty() {
            self.tokens
                .push(Token::new(std::mem::take(&mut self.plain), TokenKind::Text));
        }
    }

    fn finish(mut self, line: &str) -> Vec<Token> {
        self.flush_plain();
        if self.tokens.is_empty() {
            self.tokens.push(Token::new(line, TokenKind::Text));
        }
        self.tokens
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte position just past a quoted span starting at `start` (which must hold
/// the quote byte), honoring backslash escapes. Unterminated spans run to the
/// end of the line.
fn quoted_span_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Emit a run of identifier words, marking the ones in `keywords`.
fn keyword_pass(builder: &mut TokenBuilder, segment: &str, keywords: &[&str]) {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' {
            let start = i;
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
            let word = &segment[start..i];
            if keywords.contains(&word) {
                builder.token(word, TokenKind::Keyword);
            } else {
                builder.text(word);
            }
        } else {
            let start = i;
            while i < bytes.len() && !(bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
                i += 1;
            }
            builder.text(&segment[start..i]);
        }
    }
}

fn highlight_c(line: &str) -> Vec<Token> {
    // Preprocessor directives claim the whole line
    if C_PREPROCESSOR_DIRECTIVES
        .iter()
        .any(|d| line.starts_with(d))
    {
        return vec![Token::new(line, TokenKind::Preprocessor)];
    }

    let mut builder = TokenBuilder::default();
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut segment_start = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                keyword_pass(&mut builder, &line[segment_start..i], C_KEYWORDS);
                let end = quoted_span_end(bytes, i, bytes[i]);
                builder.token(&line[i..end], TokenKind::Str);
                i = end;
                segment_start = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                keyword_pass(&mut builder, &line[segment_start..i], C_KEYWORDS);
                builder.token(&line[i..], TokenKind::Comment);
                return builder.finish(line);
            }
            _ => i += 1,
        }
    }

    keyword_pass(&mut builder, &line[segment_start..], C_KEYWORDS);
    builder.finish(line)
}

fn highlight_python(line: &str) -> Vec<Token> {
    // Triple-quoted lines are treated wholesale; tracking docstring state
    // across lines is out of scope for a single-pass tokenizer.
    if line.contains("\"\"\"") || line.contains("'''") {
        return vec![Token::new(line, TokenKind::Str)];
    }

    let mut builder = TokenBuilder::default();
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut segment_start = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                keyword_pass(&mut builder, &line[segment_start..i], PYTHON_KEYWORDS);
                let end = quoted_span_end(bytes, i, bytes[i]);
                builder.token(&line[i..end], TokenKind::Str);
                i = end;
                segment_start = i;
            }
            b'#' => {
                keyword_pass(&mut builder, &line[segment_start..i], PYTHON_KEYWORDS);
                builder.token(&line[i..], TokenKind::Comment);
                return builder.finish(line);
            }
            _ => i += 1,
        }
    }

    keyword_pass(&mut builder, &line[segment_start..], PYTHON_KEYWORDS);
    builder.finish(line)
}

fn highlight_json(line: &str) -> Vec<Token> {
    let mut builder = TokenBuilder::default();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = quoted_span_end(bytes, i, b'"');
                // A string followed by ':' is an object key
                let mut after = end;
                while after < bytes.len() && (bytes[after] == b' ' || bytes[after] == b'\t') {
                    after += 1;
                }
                let kind = if bytes.get(after) == Some(&b':') {
                    TokenKind::Key
                } else {
                    TokenKind::Str
                };
                builder.token(&line[i..end], kind);
                i = end;
            }
            b'{' | b'}' | b'[' | b']' => {
                builder.token(&line[i..i + 1], TokenKind::Punct);
                i += 1;
            }
            b if b.is_ascii_digit()
                || (b == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) =>
            {
                let start = i;
                i += 1;
                while i < bytes.len()
                    && (bytes[i].is_ascii_digit()
                        || matches!(bytes[i], b'.' | b'e' | b'E' | b'+' | b'-'))
                {
                    i += 1;
                }
                builder.token(&line[start..i], TokenKind::Number);
            }
            _ => {
                if let Some(end) = json_literal_end(bytes, i) {
                    builder.token(&line[i..end], TokenKind::Literal);
                    i = end;
                } else {
                    let start = i;
                    i += 1;
                    while i < bytes.len() && !json_token_start(bytes, i) {
                        i += 1;
                    }
                    builder.text(&line[start..i]);
                }
            }
        }
    }

    builder.finish(line)
}

fn json_token_start(bytes: &[u8], i: usize) -> bool {
    matches!(bytes[i], b'"' | b'{' | b'}' | b'[' | b']')
        || bytes[i].is_ascii_digit()
        || (bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        || json_literal_end(bytes, i).is_some()
}

fn json_literal_end(bytes: &[u8], i: usize) -> Option<usize> {
    for literal in [b"true".as_slice(), b"false".as_slice(), b"null".as_slice()] {
        if bytes[i..].starts_with(literal) {
            let end = i + literal.len();
            if end == bytes.len() || !is_word_byte(bytes[end]) {
                return Some(end);
            }
        }
    }
    None
}

fn highlight_markdown(line: &str) -> Vec<Token> {
    let bytes = line.as_bytes();
    let indent = bytes
        .iter()
        .take_while(|b| **b == b' ' || **b == b'\t')
        .count();
    let content = &line[indent..];

    // Block quote
    if content.starts_with('>') {
        return vec![
            Token::new(&line[..indent + 1], TokenKind::Comment),
            Token::new(&content[1..], TokenKind::Quote),
        ];
    }

    // Fenced code block delimiter
    if content.starts_with("```") {
        let mut tokens = Vec::new();
        if indent > 0 {
            tokens.push(Token::new(&line[..indent], TokenKind::Text));
        }
        tokens.push(Token::new(content, TokenKind::CodeFence));
        return tokens;
    }

    // Headings: 1-6 hashes followed by a space
    if content.starts_with('#') {
        let hashes = content.bytes().take_while(|b| *b == b'#').count();
        if hashes <= 6 && content.as_bytes().get(hashes) == Some(&b' ') {
            return vec![
                Token::new(&line[..indent + hashes + 1], TokenKind::Heading),
                Token::new(&content[hashes + 1..], TokenKind::Text),
            ];
        }
    }

    // Bullet list markers
    if (content.starts_with("- ") || content.starts_with("* ") || content.starts_with("+ "))
        && content.len() > 2
    {
        return markdown_with_marker(line, indent + 2);
    }

    // Numbered list markers: digits, dot, space
    let digits = content.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && content[digits..].starts_with(". ") {
        return markdown_with_marker(line, indent + digits + 2);
    }

    // Table rows
    if content.starts_with('|') || content.bytes().filter(|b| *b == b'|').count() >= 2 {
        return markdown_table_row(line);
    }

    markdown_inline(line)
}

/// List item: marker span, then inline formatting for the remainder.
fn markdown_with_marker(line: &str, marker_end: usize) -> Vec<Token> {
    let mut tokens = vec![Token::new(&line[..marker_end], TokenKind::ListMarker)];
    tokens.extend(markdown_inline(&line[marker_end..]));
    tokens
}

fn markdown_table_row(line: &str) -> Vec<Token> {
    let mut builder = TokenBuilder::default();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'|' => {
                builder.token("|", TokenKind::Punct);
                i += 1;
            }
            b'-' | b':' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i], b'-' | b':' | b' ') {
                    i += 1;
                }
                builder.token(&line[start..i], TokenKind::Comment);
            }
            _ => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'|' {
                    i += 1;
                }
                builder.text(&line[start..i]);
            }
        }
    }

    builder.finish(line)
}

/// Inline spans: `code`, **bold**, _italic_, [text](url), ![alt](url).
fn markdown_inline(line: &str) -> Vec<Token> {
    let mut builder = TokenBuilder::default();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'`' => {
                let end = match memchr::memchr(b'`', &bytes[i + 1..]) {
                    Some(pos) => i + 1 + pos + 1,
                    None => bytes.len(),
                };
                builder.token(&line[i..end], TokenKind::Str);
                i = end;
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                let end = match find_subslice(&bytes[i + 2..], b"**") {
                    Some(pos) => i + 2 + pos + 2,
                    None => bytes.len(),
                };
                builder.token(&line[i..end], TokenKind::Bold);
                i = end;
            }
            b'_' => {
                let end = match memchr::memchr(b'_', &bytes[i + 1..]) {
                    Some(pos) => i + 1 + pos + 1,
                    None => bytes.len(),
                };
                builder.token(&line[i..end], TokenKind::Italic);
                i = end;
            }
            b'[' => match markdown_link_end(bytes, i) {
                Some(end) => {
                    builder.token(&line[i..end], TokenKind::Link);
                    i = end;
                }
                None => {
                    builder.text(&line[i..i + 1]);
                    i += 1;
                }
            },
            b'!' if bytes.get(i + 1) == Some(&b'[') => match markdown_link_end(bytes, i + 1) {
                Some(end) => {
                    builder.token(&line[i..end], TokenKind::Link);
                    i = end;
                }
                None => {
                    builder.text(&line[i..i + 1]);
                    i += 1;
                }
            },
            _ => {
                let start = i;
                i += 1;
                while i < bytes.len() && !matches!(bytes[i], b'`' | b'*' | b'_' | b'[' | b'!') {
                    i += 1;
                }
                builder.text(&line[start..i]);
            }
        }
    }

    builder.finish(line)
}

/// End of a `[text](url)` span whose `[` sits at `open`, if well formed.
fn markdown_link_end(bytes: &[u8], open: usize) -> Option<usize> {
    let close = open + memchr::memchr(b']', &bytes[open..])?;
    if bytes.get(close + 1) != Some(&b'(') {
        return None;
    }
    let paren = close + 2 + memchr::memchr(b')', &bytes[close + 2..])?;
    Some(paren + 1)
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_detection_by_extension() {
        assert_eq!(Syntax::detect(Path::new("main.cpp")), Some(Syntax::C));
        assert_eq!(Syntax::detect(Path::new("lib.h")), Some(Syntax::C));
        assert_eq!(Syntax::detect(Path::new("tool.py")), Some(Syntax::Python));
        assert_eq!(
            Syntax::detect(Path::new("README.md")),
            Some(Syntax::Markdown)
        );
        assert_eq!(Syntax::detect(Path::new("data.csv")), Some(Syntax::Csv));
        assert_eq!(Syntax::detect(Path::new("conf.json")), Some(Syntax::Json));
        assert_eq!(Syntax::detect(Path::new("notes.txt")), None);
        assert_eq!(Syntax::detect(Path::new("Makefile")), None);
    }

    #[test]
    fn test_from_name_accepts_short_aliases() {
        assert_eq!(Syntax::from_name("md"), Some(Syntax::Markdown));
        assert_eq!(Syntax::from_name("py"), Some(Syntax::Python));
        assert_eq!(Syntax::from_name("cpp"), Some(Syntax::C));
        assert_eq!(Syntax::from_name("C"), Some(Syntax::C));
        assert_eq!(Syntax::from_name("brainfuck"), None);
    }

    #[test]
    fn test_tokens_reassemble_to_original_line() {
        let lines = [
            (Syntax::C, "if (x == 42) { return \"done\"; } // ok"),
            (Syntax::Python, "def f(x): return 'y'  # comment"),
            (Syntax::Markdown, "## Title with `code` and **bold**"),
            (Syntax::Json, "{\"key\": [1, true, \"value\"]}"),
        ];
        for (syntax, line) in lines {
            let tokens = syntax.highlight_line(line);
            assert_eq!(joined(&tokens), line, "{syntax:?}");
        }
    }

    #[test]
    fn test_c_preprocessor_line() {
        let tokens = Syntax::C.highlight_line("#include <stdio.h>");
        assert_eq!(kinds(&tokens), vec![TokenKind::Preprocessor]);
    }

    #[test]
    fn test_c_keywords_strings_and_comments() {
        let tokens = Syntax::C.highlight_line("return \"a // b\"; // trailing");
        assert!(tokens
            .iter()
            .any(|t| t.text == "return" && t.kind == TokenKind::Keyword));
        assert!(tokens
            .iter()
            .any(|t| t.text == "\"a // b\"" && t.kind == TokenKind::Str));
        assert!(tokens
            .iter()
            .any(|t| t.text == "// trailing" && t.kind == TokenKind::Comment));
    }

    #[test]
    fn test_c_keyword_needs_word_boundary() {
        let tokens = Syntax::C.highlight_line("interval = 3;");
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Keyword));
    }

    #[test]
    fn test_python_comment_and_string() {
        let tokens = Syntax::Python.highlight_line("x = 'it''s'  # note");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Str));
        assert!(tokens
            .iter()
            .any(|t| t.text == "# note" && t.kind == TokenKind::Comment));
    }

    #[test]
    fn test_python_triple_quote_line_is_one_string() {
        let tokens = Syntax::Python.highlight_line("\"\"\"docstring\"\"\"");
        assert_eq!(kinds(&tokens), vec![TokenKind::Str]);
    }

    #[test]
    fn test_markdown_heading() {
        let tokens = Syntax::Markdown.highlight_line("## Section");
        assert_eq!(tokens[0].text, "## ");
        assert_eq!(tokens[0].kind, TokenKind::Heading);
        assert_eq!(tokens[1].text, "Section");
    }

    #[test]
    fn test_markdown_seven_hashes_is_not_heading() {
        let tokens = Syntax::Markdown.highlight_line("####### too deep");
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Heading));
    }

    #[test]
    fn test_markdown_bullet_and_numbered_lists() {
        let bullet = Syntax::Markdown.highlight_line("- item one");
        assert_eq!(bullet[0].text, "- ");
        assert_eq!(bullet[0].kind, TokenKind::ListMarker);

        let numbered = Syntax::Markdown.highlight_line("12. item twelve");
        assert_eq!(numbered[0].text, "12. ");
        assert_eq!(numbered[0].kind, TokenKind::ListMarker);
    }

    #[test]
    fn test_markdown_block_quote() {
        let tokens = Syntax::Markdown.highlight_line("> quoted text");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[1].kind, TokenKind::Quote);
        assert_eq!(tokens[1].text, " quoted text");
    }

    #[test]
    fn test_markdown_table_row_pipes() {
        let tokens = Syntax::Markdown.highlight_line("| a | b |");
        let pipe_count = tokens.iter().filter(|t| t.kind == TokenKind::Punct).count();
        assert_eq!(pipe_count, 3);
    }

    #[test]
    fn test_markdown_link_and_inline_code() {
        let tokens = Syntax::Markdown.highlight_line("see [docs](http://x) and `f()`");
        assert!(tokens
            .iter()
            .any(|t| t.text == "[docs](http://x)" && t.kind == TokenKind::Link));
        assert!(tokens
            .iter()
            .any(|t| t.text == "`f()`" && t.kind == TokenKind::Str));
    }

    #[test]
    fn test_json_keys_values_numbers_literals() {
        let tokens = Syntax::Json.highlight_line("{\"name\": \"x\", \"n\": -1.5e3, \"ok\": true}");
        assert!(tokens
            .iter()
            .any(|t| t.text == "\"name\"" && t.kind == TokenKind::Key));
        assert!(tokens
            .iter()
            .any(|t| t.text == "\"x\"" && t.kind == TokenKind::Str));
        assert!(tokens
            .iter()
            .any(|t| t.text == "-1.5e3" && t.kind == TokenKind::Number));
        assert!(tokens
            .iter()
            .any(|t| t.text == "true" && t.kind == TokenKind::Literal));
        let brackets = tokens.iter().filter(|t| t.kind == TokenKind::Punct).count();
        assert_eq!(brackets, 2);
    }

    #[test]
    fn test_empty_line_yields_single_text_token() {
        for syntax in [Syntax::C, Syntax::Python, Syntax::Markdown, Syntax::Json] {
            let tokens = syntax.highlight_line("");
            assert_eq!(tokens.len(), 1, "{syntax:?}");
            assert_eq!(tokens[0].kind, TokenKind::Text);
        }
    }

    #[test]
    fn test_non_ascii_text_passes_through() {
        let tokens = Syntax::C.highlight_line("printf(\"héllo wörld\");");
        assert_eq!(joined(&tokens), "printf(\"héllo wörld\");");
    }
}
