//! # blogmark-syntax
//!
//! Tokenizer and tree builder for the blog markup dialect: ATX headings
//! (`#` to `#####`), hyphen and numbered lists, blockquotes with
//! `[!NOTE]`-style callouts, fenced code blocks, a small frontmatter
//! header and the inline forms `` `code` ``, `[text](url)`, `**bold**`
//! and `_italic_`.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Tree Builder → Node tree
//!               (rule table,     (ancestor search)
//!                inline pass)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! An ordered table of anchored rules is tried at a cursor. Block leaders
//! only fire at the start of a line (or right after a quote marker), so a
//! `#` in the middle of a sentence is just text. Each captured text line
//! is lexed a second time for inline constructs.
//!
//! ```text
//! "# Hello **you**" → [Heading(1) "# ", Text "Hello ", BoldText "you"]
//! ```
//!
//! Every token keeps a `(line, column)` span over the source text,
//! including tokens found by the inline pass.
//!
//! ### 2. Tree builder ([`tree`] module)
//!
//! Tokens are placed one at a time. Inline tokens become *values* of the
//! block on their line; blocks nest under headings of higher priority,
//! under list items they are indented past, and under quotes they share a
//! line with. Consecutive quote lines collapse into one quote node.
//!
//! ## Quick Start
//!
//! ```
//! use blogmark_syntax::{parse_document, TokenKind};
//!
//! let root = parse_document("# Hello\n- item\n").unwrap();
//! let heading = &root.children[0];
//! assert_eq!(heading.kind(), TokenKind::Heading(1));
//! assert_eq!(heading.flattened_text(), "Hello");
//! assert_eq!(heading.children[0].kind(), TokenKind::HyphenList);
//! ```
//!
//! The only failure is a [`SyntaxError`]: some text no rule accepts (a lone
//! carriage return, for instance).

pub mod error;
pub mod lexer;
pub mod token;
pub mod tree;

pub use error::SyntaxError;
pub use lexer::tokenize;
pub use token::{CalloutKind, Position, Span, Token, TokenKind};
pub use tree::{Node, build};

/// Tokenize `source` and build its tree.
pub fn parse_document(source: &str) -> Result<Node, SyntaxError> {
    Ok(build(tokenize(source)?))
}
