//! Token kinds, source positions and the [`Token`] value produced by the lexer.
//!
//! Tokens are plain data. Apart from classification predicates and the
//! debug formatting used by tree dumps, nothing here has behaviour.

use std::fmt;

/// The four annotated blockquote variants (`> [!NOTE]` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    Note,
    Important,
    Warning,
    Example,
}

impl CalloutKind {
    /// Caption used when the callout line carries no text of its own.
    pub fn label(self) -> &'static str {
        match self {
            CalloutKind::Note => "Note",
            CalloutKind::Important => "Important",
            CalloutKind::Warning => "Warning",
            CalloutKind::Example => "Example",
        }
    }

    /// Lower-case name, used for CSS classes and debug output.
    pub fn name(self) -> &'static str {
        match self {
            CalloutKind::Note => "note",
            CalloutKind::Important => "important",
            CalloutKind::Warning => "warning",
            CalloutKind::Example => "example",
        }
    }
}

/// Every kind of token the lexer can emit, plus the synthetic document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Synthetic root of the tree. Never produced by the lexer.
    Document,
    Frontmatter,
    /// ATX heading, level 1 to 5.
    Heading(u8),
    Callout(CalloutKind),
    Quote,
    HyphenList,
    NumberedList,
    CodeBlock,
    Paragraph,

    // === Inline kinds ===
    Text,
    Link,
    InlineCode,
    BoldText,
    ItalicText,
}

impl TokenKind {
    /// Deepest heading level the markup supports.
    pub const MAX_HEADING_LEVEL: u8 = 5;

    pub fn is_heading(self) -> bool {
        matches!(self, TokenKind::Heading(_))
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            TokenKind::Heading(level) => Some(level),
            _ => None,
        }
    }

    /// Quote or any callout variant.
    pub fn is_quote_like(self) -> bool {
        matches!(self, TokenKind::Quote | TokenKind::Callout(_))
    }

    /// Kinds that nest by indentation (list items and paragraphs used as items).
    pub fn is_indentable(self) -> bool {
        matches!(
            self,
            TokenKind::HyphenList | TokenKind::NumberedList | TokenKind::Paragraph
        )
    }

    /// Kinds that live inside a block's text run.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            TokenKind::Text
                | TokenKind::Link
                | TokenKind::InlineCode
                | TokenKind::BoldText
                | TokenKind::ItalicText
        )
    }

    /// Whether debug output should show the token's values.
    fn shows_values(self) -> bool {
        matches!(
            self,
            TokenKind::NumberedList
                | TokenKind::Link
                | TokenKind::InlineCode
                | TokenKind::BoldText
                | TokenKind::ItalicText
                | TokenKind::CodeBlock
                | TokenKind::Frontmatter
                | TokenKind::Text
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Document => f.write_str("source_file"),
            TokenKind::Frontmatter => f.write_str("frontmatter"),
            TokenKind::Heading(level) => write!(f, "heading_{level}"),
            TokenKind::Callout(kind) => write!(f, "callout_{}", kind.name()),
            TokenKind::Quote => f.write_str("quote"),
            TokenKind::HyphenList => f.write_str("hyphen_list"),
            TokenKind::NumberedList => f.write_str("numbered_list"),
            TokenKind::CodeBlock => f.write_str("code_block"),
            TokenKind::Paragraph => f.write_str("paragraph"),
            TokenKind::Text => f.write_str("text"),
            TokenKind::Link => f.write_str("link"),
            TokenKind::InlineCode => f.write_str("inline_code"),
            TokenKind::BoldText => f.write_str("bold_text"),
            TokenKind::ItalicText => f.write_str("italic_text"),
        }
    }
}

/// A 0-indexed (line, column) coordinate in the source text.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Shift a position produced on a single-line substring to absolute coordinates.
    #[must_use]
    pub fn offset_by(self, origin: Position) -> Self {
        Self {
            line: origin.line + self.line,
            column: origin.column + self.column,
        }
    }
}

/// Source span of a token: `start` is the first character, `end` the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Out-of-range span carried by the synthetic document root.
    pub const fn sentinel() -> Self {
        let p = Position::new(usize::MAX, usize::MAX);
        Self { start: p, end: p }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }

    #[must_use]
    pub fn offset_by(self, origin: Position) -> Self {
        Self {
            start: self.start.offset_by(origin),
            end: self.end.offset_by(origin),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}] - [{},{}]",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A classified piece of source text.
///
/// `values` holds the kind-specific payload:
///
/// | kind | values |
/// |---|---|
/// | block leaders | the marker text, e.g. `"# "` or `"1. "` |
/// | `Paragraph`, `Text`, `InlineCode`, `BoldText`, `ItalicText` | the text |
/// | `Link` | `[placeholder, url]` |
/// | `CodeBlock` | `[language, code]` |
/// | `Frontmatter` | flattened `key, value` pairs |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub values: Vec<String>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, values: Vec<String>) -> Self {
        Self { kind, values, span }
    }

    /// The synthetic root token.
    pub fn document() -> Self {
        Self::new(TokenKind::Document, Span::sentinel(), Vec::new())
    }

    /// Column of the token's first character.
    pub fn indentation(&self) -> usize {
        self.span.start.column
    }

    pub fn start_line(&self) -> usize {
        self.span.start.line
    }

    pub fn end_line(&self) -> usize {
        self.span.end.line
    }

    /// First value, or the empty string.
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }

    fn joined_values(&self) -> String {
        self.values
            .iter()
            .map(|v| v.replace('\n', "\\n"))
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.shows_values() {
            write!(f, "{} ({})", self.kind, self.joined_values())?;
        } else {
            write!(f, "{} ()", self.kind)?;
        }
        if !self.span.is_sentinel() {
            write!(f, "    {}", self.span)?;
        }
        Ok(())
    }
}
