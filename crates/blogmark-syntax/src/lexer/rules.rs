//! The block rule table.
//!
//! A rule is a pattern anchored at the cursor, a positional guard and the
//! action that turns the matched text into tokens. Rules are tried in table
//! order; the first one that matches wins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Lexer, frontmatter, indent_len, inline};
use crate::token::{CalloutKind, Token, TokenKind};

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*```[ \t]*$").expect("valid closing fence pattern"));

static QUOTE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*>[ \t]?").expect("valid quote prefix pattern"));

pub(super) static BLOCK_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = vec![
        Rule::new(r"^(?:[ \t]*\r?\n)+", Guard::Anywhere, Action::Skip),
        Rule::new(r"^---[ \t]*\r?\n", Guard::FirstConstruct, Action::Frontmatter),
    ];

    // Longest marker first so `##` is never read as `#` followed by text.
    for level in (1..=TokenKind::MAX_HEADING_LEVEL).rev() {
        let pattern = format!(r"^[ \t]*{}[ \t]+", "#".repeat(usize::from(level)));
        rules.push(Rule::new(
            &pattern,
            Guard::BlockStart,
            Action::Leader(TokenKind::Heading(level)),
        ));
    }

    rules.push(Rule::new(
        r"^[ \t]*-[ \t]+",
        Guard::BlockStart,
        Action::Leader(TokenKind::HyphenList),
    ));
    rules.push(Rule::new(
        r"^[ \t]*\d+\.[ \t]+",
        Guard::BlockStart,
        Action::Leader(TokenKind::NumberedList),
    ));

    for (tag, kind) in [
        ("NOTE", CalloutKind::Note),
        ("IMPORTANT", CalloutKind::Important),
        ("WARNING", CalloutKind::Warning),
        ("EXAMPLE", CalloutKind::Example),
    ] {
        let pattern = format!(r"^[ \t]*>[ \t]*\[!{tag}\][ \t]*");
        rules.push(Rule::new(
            &pattern,
            Guard::BlockStart,
            Action::Leader(TokenKind::Callout(kind)),
        ));
    }

    rules.push(Rule::new(
        r"^[ \t]*>(?:[ \t]+|\r?(?m:$))",
        Guard::BlockStart,
        Action::Leader(TokenKind::Quote),
    ));
    rules.push(Rule::new(
        r"^[ \t]*```[^\r\n]*",
        Guard::BlockStart,
        Action::CodeFence,
    ));
    rules.push(Rule::new(r"^[^\r\n]+", Guard::Anywhere, Action::Paragraph));

    rules
});

/// Where a rule is allowed to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Guard {
    Anywhere,
    /// Start of a source line, or right after a plain quote marker.
    BlockStart,
    /// Start of a line with nothing tokenized yet.
    FirstConstruct,
}

impl Guard {
    fn holds(self, lexer: &Lexer<'_>) -> bool {
        match self {
            Guard::Anywhere => true,
            Guard::BlockStart => lexer.at_line_start() || lexer.follows_quote(),
            Guard::FirstConstruct => !lexer.has_tokens() && lexer.at_line_start(),
        }
    }
}

/// What a matched rule does with its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    Skip,
    Frontmatter,
    /// A block marker such as `## ` or `> [!NOTE]`; the marker is the value.
    Leader(TokenKind),
    CodeFence,
    Paragraph,
}

impl Action {
    /// Full length consumed once the opening pattern matched `opening` bytes.
    ///
    /// Multi-line constructs extend past their opening line here, and
    /// frontmatter without a closing line does not match at all. A fence
    /// opened after a quote marker only spans quote-prefixed lines.
    fn extent(self, remainder: &str, opening: usize, quoted: bool) -> Option<usize> {
        match self {
            Action::Frontmatter => frontmatter::extent(remainder, opening),
            Action::CodeFence => Some(fence_extent(remainder, opening, quoted)),
            _ => Some(opening),
        }
    }

    pub(super) fn apply(self, lexer: &mut Lexer<'_>, len: usize) {
        let text = &lexer.remainder()[..len];
        match self {
            Action::Skip => lexer.advance(len),
            Action::Frontmatter => {
                let values = frontmatter::values(text);
                let span = lexer.consume(0, len);
                lexer.push(Token::new(TokenKind::Frontmatter, span, values));
            }
            Action::Leader(kind) => {
                let indent = indent_len(text);
                let marker = text[indent..].to_string();
                let span = lexer.consume(indent, len);
                lexer.push(Token::new(kind, span, vec![marker]));
            }
            Action::CodeFence => {
                let indent = indent_len(text);
                let quoted = lexer.follows_quote();
                let (language, code) = split_fence(&text[indent..], indent, quoted);
                let span = lexer.consume(indent, len);
                lexer.push(Token::new(TokenKind::CodeBlock, span, vec![language, code]));
            }
            Action::Paragraph => inline::paragraph(lexer, len),
        }
    }
}

pub(super) struct Rule {
    pattern: Regex,
    guard: Guard,
    pub(super) action: Action,
}

impl Rule {
    fn new(pattern: &str, guard: Guard, action: Action) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid block rule pattern"),
            guard,
            action,
        }
    }

    /// Length of the text this rule consumes at the cursor, if it applies.
    pub(super) fn match_at(&self, lexer: &Lexer<'_>) -> Option<usize> {
        if !self.guard.holds(lexer) {
            return None;
        }
        let remainder = lexer.remainder();
        let found = self.pattern.find(remainder)?;
        if found.is_empty() {
            return None;
        }
        self.action.extent(remainder, found.end(), lexer.follows_quote())
    }
}

/// A fence body line with its quote prefix removed, or `None` when a quoted
/// fence reaches a line outside the quote.
fn fence_line(line: &str, quoted: bool) -> Option<&str> {
    if !quoted {
        return Some(line);
    }
    QUOTE_PREFIX.find(line).map(|prefix| &line[prefix.end()..])
}

/// Extent of a fenced block whose opening line is `opening` bytes long.
///
/// Stops after the closing fence (excluding its line break). An unterminated
/// fence runs to the end of input, or for a quoted fence to the end of the
/// last quoted line.
fn fence_extent(remainder: &str, opening: usize, quoted: bool) -> usize {
    let rest = &remainder[opening..];
    let body_start = if rest.starts_with("\r\n") {
        opening + 2
    } else if rest.starts_with('\n') {
        opening + 1
    } else {
        return opening;
    };

    let mut offset = body_start;
    let mut last_line_end = opening;
    for line in remainder[body_start..].split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        let Some(inner) = fence_line(content, quoted) else {
            return last_line_end;
        };
        if CLOSING_FENCE.is_match(inner) {
            return offset + content.len();
        }
        last_line_end = offset + content.len();
        offset += line.len();
    }

    remainder.trim_end_matches(['\r', '\n']).len().max(opening)
}

/// Split a fenced block (starting at its backticks) into language tag and code.
fn split_fence(block: &str, indent: usize, quoted: bool) -> (String, String) {
    let mut lines = block.lines();
    let language = lines
        .next()
        .unwrap_or("")
        .trim_start_matches('`')
        .trim()
        .to_string();

    let mut body: Vec<&str> = lines.filter_map(|line| fence_line(line, quoted)).collect();
    if body.last().is_some_and(|line| CLOSING_FENCE.is_match(line)) {
        body.pop();
    }

    let code = body
        .into_iter()
        .map(|line| dedent(line, indent))
        .collect::<Vec<_>>()
        .join("\n");

    (language, code)
}

/// Strip at most `n` leading spaces or tabs.
fn dedent(line: &str, n: usize) -> &str {
    let strip = line
        .bytes()
        .take(n)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[strip..]
}
