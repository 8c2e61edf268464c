//! Paragraph capture and the inline sub-lexer.
//!
//! The paragraph rule captures the rest of the current line. When the
//! capture starts a block (line start or right after a quote marker) it is
//! recorded as a `Paragraph` token first. The captured text is then lexed
//! again on its own with the inline rules; tokens produced there carry
//! positions relative to the capture and are shifted to absolute ones.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Lexer, indent_len};
use crate::token::{Span, Token, TokenKind};

struct InlineRule {
    pattern: Regex,
    kind: TokenKind,
}

/// Inline rules in priority order. Capture groups become the token values.
static INLINE_RULES: Lazy<[InlineRule; 4]> = Lazy::new(|| {
    let rule = |pattern: &str, kind| InlineRule {
        pattern: Regex::new(pattern).expect("valid inline pattern"),
        kind,
    };
    [
        rule(r"^`([^\n`]*)`", TokenKind::InlineCode),
        rule(r"^\[([^\n\[\]()]*)\]\(([^\n\[\]()]*)\)", TokenKind::Link),
        rule(r"^\*\*([^\n*]*)\*\*", TokenKind::BoldText),
        rule(r"^_([^\n_]*)_", TokenKind::ItalicText),
    ]
});

/// Consume `len` bytes of line content as a paragraph.
pub(super) fn paragraph(lexer: &mut Lexer<'_>, len: usize) {
    let line = &lexer.remainder()[..len];
    let indent = indent_len(line);
    let content = line[indent..].trim_end();
    if content.is_empty() {
        lexer.advance(len);
        return;
    }

    let starts_block = lexer.at_line_start() || lexer.follows_quote();
    let origin = lexer.position_at(lexer.pos + indent);
    let span = lexer.consume(indent, indent + content.len());
    if starts_block {
        lexer.push(Token::new(
            TokenKind::Paragraph,
            span,
            vec![content.to_string()],
        ));
    }

    for mut token in tokenize_inline(content) {
        token.span = token.span.offset_by(origin);
        lexer.push(token);
    }

    lexer.advance(len - indent - content.len());
}

/// Lex a single line of text into inline tokens with line-relative spans.
///
/// Never fails: characters no rule claims accumulate into `Text` runs.
pub(super) fn tokenize_inline(content: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(content);
    let mut text_start = 0;

    while !lexer.at_eof() {
        let remainder = lexer.remainder();
        let matched = INLINE_RULES.iter().find_map(|rule| {
            rule.pattern
                .captures(remainder)
                .map(|captures| (rule.kind, captures))
        });

        match matched {
            Some((kind, captures)) => {
                flush_text(&mut lexer, text_start);
                let values = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or("", |m| m.as_str()).to_string())
                    .collect();
                let span = lexer.consume(0, captures[0].len());
                lexer.tokens.push(Token::new(kind, span, values));
                text_start = lexer.pos;
            }
            None => {
                let step = remainder.chars().next().map_or(1, char::len_utf8);
                lexer.advance(step);
            }
        }
    }

    flush_text(&mut lexer, text_start);
    lexer.tokens
}

fn flush_text(lexer: &mut Lexer<'_>, from: usize) {
    if from >= lexer.pos {
        return;
    }
    let span = Span::new(lexer.position_at(from), lexer.position_before(lexer.pos));
    let text = lexer.source[from..lexer.pos].to_string();
    lexer.tokens.push(Token::new(TokenKind::Text, span, vec![text]));
}
