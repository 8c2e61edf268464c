//! # Lexer - Tokenizing Blog Markup
//!
//! The first stage of the pipeline: the source text is consumed left to
//! right by trying an ordered table of rules at the cursor. The first rule
//! whose pattern matches *at* the cursor (and whose positional guard holds)
//! consumes its match and emits zero or more [`Token`]s.
//!
//! ```
//! use blogmark_syntax::lexer::tokenize;
//! use blogmark_syntax::TokenKind;
//!
//! let tokens = tokenize("# Hello\n").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds, vec![TokenKind::Heading(1), TokenKind::Text]);
//! ```
//!
//! ## Rule order
//!
//! 1. blank lines (skipped, never tokenized)
//! 2. frontmatter (first construct only)
//! 3. block leaders: headings 5 down to 1, hyphen and numbered list
//!    markers, callouts, quote markers
//! 4. code fences
//! 5. paragraph fallback, which re-tokenizes the captured line with the
//!    inline rule set (see [`inline`])
//!
//! Block leaders and fences only apply at the start of a source line or
//! right after a quote marker. Elsewhere the same text falls through to the
//! paragraph rule, which is how `text # not a heading` stays text.
//!
//! ## Positions
//!
//! Every emitted token gets a `(line, column)` span computed from the
//! cursor's byte offset by counting newlines up to it. Tokens produced by
//! the inline pass are computed against the captured substring and then
//! shifted by the substring's absolute start.

mod frontmatter;
mod inline;
mod rules;

use crate::error::SyntaxError;
use crate::token::{Position, Span, Token, TokenKind};

/// Lexer state: the source, a byte cursor into it and the tokens emitted so far.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Run the block rule table until the source is exhausted.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        while !self.at_eof() {
            let Some((rule, len)) = rules::BLOCK_RULES
                .iter()
                .find_map(|rule| rule.match_at(&self).map(|len| (rule, len)))
            else {
                return Err(SyntaxError::new(
                    self.remainder(),
                    self.position_at(self.pos),
                ));
            };

            rule.action.apply(&mut self, len);
        }

        Ok(self.tokens)
    }

    /// The unconsumed rest of the source.
    pub fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// True at offset 0 or right after a newline.
    pub fn at_line_start(&self) -> bool {
        self.pos == 0 || self.source[..self.pos].ends_with('\n')
    }

    /// True when the last emitted token is a plain quote marker.
    pub fn follows_quote(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|token| token.kind == TokenKind::Quote)
    }

    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn push(&mut self, token: Token) {
        log::trace!("lexed {token}");
        self.tokens.push(token);
    }

    /// `(line, column)` of the character starting at byte offset `byte`.
    pub fn position_at(&self, byte: usize) -> Position {
        let prefix = &self.source[..byte];
        let line = prefix.matches('\n').count();
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Position::new(line, prefix[line_start..].chars().count())
    }

    /// Position of the last character before byte offset `byte`.
    pub fn position_before(&self, byte: usize) -> Position {
        let last = self.source[..byte]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.position_at(last)
    }

    /// Consume `len` bytes whose first `skip` bytes are leading indentation,
    /// returning the span of the consumed text after the indentation.
    fn consume(&mut self, skip: usize, len: usize) -> Span {
        let start = self.position_at(self.pos + skip);
        self.advance(len);
        let end = self.position_before(self.pos);
        Span::new(start, end)
    }
}

/// Tokenize a whole document.
///
/// Fails with [`SyntaxError`] when no rule matches at some cursor position.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).tokenize()
}

/// Length in bytes of the leading spaces and tabs of `s`.
fn indent_len(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}
