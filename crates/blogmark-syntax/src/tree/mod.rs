//! # Tree Builder
//!
//! Turns the flat token sequence into a [`Node`] tree. Tokens are inserted
//! one at a time, in source order. Each insertion is an *ancestor search*
//! starting at the root: the current ancestor's children are inspected from
//! last to first, and the first one that relates to the new node decides
//! where it goes.
//!
//! For a candidate child, the relations are tested in this order:
//!
//! 1. **value**: an inline token on the candidate's line becomes one of the
//!    candidate's values (a plain quote marker never takes values)
//! 2. **quote fragment**: a quote marker on the line right after a quote or
//!    callout at the same indentation extends that node instead of creating
//!    a new one
//! 3. **inside quote**: anything on the line a quote or callout starts or
//!    ends on belongs inside it
//! 4. **inside heading**: later content of lower priority (deeper heading
//!    or non-heading) belongs inside a heading
//! 5. **inside indentable**: later list items and paragraphs indented
//!    further belong inside a list item or paragraph
//!
//! Without any related candidate the node is appended to the ancestor.
//!
//! Because tokens arrive in source order and nodes are never moved once
//! attached, the nesting invariants (headings only contain deeper
//! headings, indentable blocks only contain deeper-indented ones) hold by
//! construction.

mod display;

use crate::token::{Token, TokenKind};

/// A tree node: one token plus the nodes nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub token: Token,
    /// Inline nodes forming this node's leading text run.
    pub values: Vec<Node>,
    /// Block nodes nested under this node.
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The synthetic document root.
    pub fn root() -> Self {
        Self::new(Token::document())
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Plain text of this node's inline values; links contribute their placeholder.
    pub fn flattened_text(&self) -> String {
        let mut text = String::new();
        for value in &self.values {
            text.push_str(value.token.value());
            text.push_str(&value.flattened_text());
        }
        text
    }
}

/// How a new node relates to an existing candidate child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Value,
    QuoteFragment,
    Inside,
}

fn relation(candidate: &Token, new: &Token) -> Option<Relation> {
    if is_value_of(candidate, new) {
        Some(Relation::Value)
    } else if is_quote_fragment(candidate, new) {
        Some(Relation::QuoteFragment)
    } else if is_inside_quote(candidate, new)
        || is_inside_heading(candidate, new)
        || is_inside_indentable(candidate, new)
    {
        Some(Relation::Inside)
    } else {
        None
    }
}

fn is_value_of(candidate: &Token, new: &Token) -> bool {
    new.kind.is_inline()
        && candidate.kind != TokenKind::Quote
        && new.start_line() == candidate.start_line()
}

fn is_quote_fragment(candidate: &Token, new: &Token) -> bool {
    new.kind == TokenKind::Quote
        && candidate.kind.is_quote_like()
        && new.start_line() == candidate.end_line() + 1
        && new.indentation() == candidate.indentation()
}

fn is_inside_quote(candidate: &Token, new: &Token) -> bool {
    candidate.kind.is_quote_like()
        && (new.start_line() == candidate.start_line() || new.start_line() == candidate.end_line())
}

fn is_inside_heading(candidate: &Token, new: &Token) -> bool {
    let Some(level) = candidate.kind.heading_level() else {
        return false;
    };
    new.start_line() > candidate.start_line()
        && new.kind.heading_level().is_none_or(|new_level| new_level > level)
}

fn is_inside_indentable(candidate: &Token, new: &Token) -> bool {
    candidate.kind.is_indentable()
        && new.start_line() > candidate.start_line()
        && new.indentation() > candidate.indentation()
}

/// Place `node` somewhere below `ancestor`.
fn insert(ancestor: &mut Node, node: Node) {
    let placement = ancestor
        .children
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, candidate)| relation(&candidate.token, &node.token).map(|r| (i, r)));

    match placement {
        Some((i, Relation::Value)) => ancestor.children[i].values.push(node),
        Some((i, Relation::QuoteFragment)) => {
            ancestor.children[i].token.span.end = node.token.span.end;
        }
        Some((i, Relation::Inside)) => insert(&mut ancestor.children[i], node),
        None => ancestor.children.push(node),
    }
}

/// Build a tree from tokens in source order. Never fails.
pub fn build(tokens: impl IntoIterator<Item = Token>) -> Node {
    let mut root = Node::root();
    for token in tokens {
        insert(&mut root, Node::new(token));
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::token::{CalloutKind, Position};
    use pretty_assertions::assert_eq;

    fn tree(source: &str) -> Node {
        build(tokenize(source).unwrap())
    }

    fn kinds(nodes: &[Node]) -> Vec<TokenKind> {
        nodes.iter().map(Node::kind).collect()
    }

    #[test]
    fn empty_document_is_bare_root() {
        let root = tree("");
        assert_eq!(root.kind(), TokenKind::Document);
        assert!(root.children.is_empty());
    }

    #[test]
    fn inline_tokens_become_values() {
        let root = tree("- some **bold** text");
        assert_eq!(kinds(&root.children), vec![TokenKind::HyphenList]);
        let item = &root.children[0];
        assert_eq!(
            kinds(&item.values),
            vec![TokenKind::Text, TokenKind::BoldText, TokenKind::Text]
        );
        assert!(item.children.is_empty());
    }

    #[test]
    fn content_nests_under_heading() {
        let root = tree("# Title\nintro\n## Sub\nbody\n# Next");
        assert_eq!(
            kinds(&root.children),
            vec![TokenKind::Heading(1), TokenKind::Heading(1)]
        );
        let title = &root.children[0];
        assert_eq!(
            kinds(&title.children),
            vec![TokenKind::Paragraph, TokenKind::Heading(2)]
        );
        assert_eq!(kinds(&title.children[1].children), vec![TokenKind::Paragraph]);
    }

    #[test]
    fn same_level_heading_is_a_sibling() {
        let root = tree("## a\n## b\n### c\n## d");
        assert_eq!(
            kinds(&root.children),
            vec![TokenKind::Heading(2), TokenKind::Heading(2), TokenKind::Heading(2)]
        );
        assert_eq!(kinds(&root.children[1].children), vec![TokenKind::Heading(3)]);
    }

    #[test]
    fn list_items_nest_by_indentation() {
        let root = tree("- a\n  - b\n    - c\n  - d\n- e");
        assert_eq!(
            kinds(&root.children),
            vec![TokenKind::HyphenList, TokenKind::HyphenList]
        );
        let a = &root.children[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].flattened_text(), "b");
        assert_eq!(a.children[0].children[0].flattened_text(), "c");
        assert_eq!(a.children[1].flattened_text(), "d");
    }

    #[test]
    fn equal_indentation_does_not_nest() {
        let root = tree("1. one\n2. two");
        assert_eq!(
            kinds(&root.children),
            vec![TokenKind::NumberedList, TokenKind::NumberedList]
        );
    }

    #[test]
    fn quote_lines_merge_into_one_node() {
        let root = tree("> a\n> b\n");
        assert_eq!(kinds(&root.children), vec![TokenKind::Quote]);
        let quote = &root.children[0];
        assert_eq!(quote.token.span.end, Position::new(1, 1));
        assert_eq!(
            kinds(&quote.children),
            vec![TokenKind::Paragraph, TokenKind::Paragraph]
        );
        assert_eq!(quote.children[0].flattened_text(), "a");
        assert_eq!(quote.children[1].flattened_text(), "b");
    }

    #[test]
    fn quotes_separated_by_blank_line_stay_apart() {
        let root = tree("> a\n\n> b");
        assert_eq!(kinds(&root.children), vec![TokenKind::Quote, TokenKind::Quote]);
    }

    #[test]
    fn quotes_at_different_indentation_stay_apart() {
        let root = tree("> a\n  > b");
        assert_eq!(kinds(&root.children), vec![TokenKind::Quote, TokenKind::Quote]);
        assert_eq!(root.children[0].token.end_line(), 0);
        assert_eq!(root.children[0].children[0].flattened_text(), "a");
        assert_eq!(root.children[1].token.indentation(), 2);
        assert_eq!(root.children[1].children[0].flattened_text(), "b");
    }

    #[test]
    fn callout_after_quote_is_a_sibling() {
        let root = tree("> q\n> [!NOTE]");
        assert_eq!(
            kinds(&root.children),
            vec![TokenKind::Quote, TokenKind::Callout(CalloutKind::Note)]
        );
        let quote = &root.children[0];
        assert_eq!(quote.token.end_line(), 0);
        assert_eq!(kinds(&quote.children), vec![TokenKind::Paragraph]);
        assert!(root.children[1].children.is_empty());
    }

    #[test]
    fn callout_caption_and_body() {
        let root = tree("> [!WARNING] Careful\n> body text\n>\n> more");
        assert_eq!(
            kinds(&root.children),
            vec![TokenKind::Callout(CalloutKind::Warning)]
        );
        let callout = &root.children[0];
        assert_eq!(callout.flattened_text(), "Careful");
        assert_eq!(
            kinds(&callout.children),
            vec![TokenKind::Paragraph, TokenKind::Paragraph]
        );
        assert_eq!(callout.token.end_line(), 3);
    }

    #[test]
    fn quoted_heading_lives_inside_quote() {
        let root = tree("> # Inside");
        let quote = &root.children[0];
        assert_eq!(quote.kind(), TokenKind::Quote);
        assert_eq!(kinds(&quote.children), vec![TokenKind::Heading(1)]);
        assert_eq!(quote.children[0].flattened_text(), "Inside");
    }

    #[test]
    fn hash_mid_line_stays_paragraph() {
        let root = tree("text # not a heading");
        assert_eq!(kinds(&root.children), vec![TokenKind::Paragraph]);
        assert_eq!(root.children[0].flattened_text(), "text # not a heading");
    }

    #[test]
    fn link_flattens_to_placeholder() {
        let root = tree("# See [the docs](https://x.dev) now");
        assert_eq!(root.children[0].flattened_text(), "See the docs now");
    }

    #[test]
    fn children_start_after_parent() {
        fn check(node: &Node) {
            for child in &node.children {
                if !node.token.span.is_sentinel() {
                    assert!(child.token.span.start > node.token.span.start, "{child:?}");
                }
                check(child);
            }
            for pair in node.children.windows(2) {
                assert!(pair[0].token.span.start < pair[1].token.span.start);
            }
        }
        check(&tree(
            "# A\n- one\n  - two\n    para\n> q\n> [!NOTE]\n## B\n```\ncode\n```\n1. x",
        ));
    }
}
