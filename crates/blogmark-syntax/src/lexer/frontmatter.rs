//! Frontmatter block: `---` lines around `key: value` properties.
//!
//! ```text
//! ---
//! id: "Hello world"
//! date: 2024-05-01
//! tags:
//!   - rust
//!   - parsing
//! ---
//! ```
//!
//! Body lines are split into pieces with a tiny [Logos] lexer; only `id`,
//! `date` and `tags` are kept. The token's values are flattened pairs in
//! source order, tags joined with `,`.
//!
//! [Logos]: https://docs.rs/logos

use logos::Logos;

const KEYS: [&str; 3] = ["id", "date", "tags"];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    #[regex(r"[A-Za-z]+:", priority = 4)]
    Key,

    #[token("-", priority = 10)]
    Dash,

    #[regex(r"[ \t]+")]
    Space,

    #[regex(r"[^ \t\r\n]+")]
    Word,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Property { key: &'a str, value: &'a str },
    Item(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let mut pieces = Piece::lexer(line).spanned();
    match pieces.next() {
        Some((Ok(Piece::Key), span)) => Line::Property {
            key: &line[..span.end - 1],
            value: line[span.end..].trim(),
        },
        Some((Ok(Piece::Space), _)) => {
            let dash = pieces.next();
            let gap = pieces.next();
            match (dash, gap, pieces.next()) {
                (
                    Some((Ok(Piece::Dash), _)),
                    Some((Ok(Piece::Space), _)),
                    Some((Ok(Piece::Word), span)),
                ) => Line::Item(&line[span]),
                _ => Line::Other,
            }
        }
        _ => Line::Other,
    }
}

/// Byte length of a frontmatter block whose opening line is `opening` bytes,
/// or `None` when no closing `---` line follows.
pub(super) fn extent(remainder: &str, opening: usize) -> Option<usize> {
    let mut offset = opening;
    for line in remainder[opening..].split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim_end() == "---" {
            return Some(offset + content.len());
        }
        offset += line.len();
    }
    None
}

/// Flattened `key, value` pairs for a complete block, delimiters included.
pub(super) fn values(block: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut body = block.lines().skip(1).peekable();

    while let Some(line) = body.next() {
        let Line::Property { key, value } = classify(line) else {
            continue;
        };
        if !KEYS.contains(&key) {
            continue;
        }

        let value = if key == "tags" {
            let mut tags = Vec::new();
            while let Some(Line::Item(tag)) = body.peek().copied().map(classify) {
                tags.push(tag);
                body.next();
            }
            tags.join(",")
        } else {
            unquote(value).to_string()
        };

        values.push(key.to_string());
        values.push(value);
    }

    values
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(value)
        .trim()
}
