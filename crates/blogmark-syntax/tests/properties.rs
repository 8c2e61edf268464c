use blogmark_syntax::{Node, Position, TokenKind, parse_document, tokenize};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// A line of inline content that never starts with a block marker.
fn inline_line_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("word"),
        Just("héllo"),
        Just("**bold**"),
        Just("_it_"),
        Just("`code`"),
        Just("[link](https://example.com)"),
        Just("a # b"),
    ];
    prop::collection::vec(piece, 1..6).prop_map(|pieces| pieces.join(" "))
}

/// Parent of every heading, by index, per the "pop until shallower" stack model.
fn stack_model(levels: &[u8]) -> Vec<Option<usize>> {
    let mut stack: Vec<usize> = Vec::new();
    levels
        .iter()
        .enumerate()
        .map(|(i, level)| {
            while stack.last().is_some_and(|&top| levels[top] >= *level) {
                stack.pop();
            }
            let parent = stack.last().copied();
            stack.push(i);
            parent
        })
        .collect()
}

/// Parent of every heading, by source line (which is also its index).
fn tree_parents(root: &Node, count: usize) -> Vec<Option<usize>> {
    fn walk(node: &Node, parent: Option<usize>, out: &mut [Option<usize>]) {
        for child in &node.children {
            if child.kind().is_heading() {
                out[child.token.start_line()] = parent;
                walk(child, Some(child.token.start_line()), out);
            }
        }
    }

    let mut out = vec![None; count];
    walk(root, None, &mut out);
    out
}

proptest! {
    #[test]
    fn inline_positions_translate_to_absolute(
        preceding in 0usize..4,
        indent in 0usize..4,
        line in inline_line_strategy(),
    ) {
        let standalone = tokenize(&line).unwrap();

        let mut source = String::new();
        for n in 0..preceding {
            source.push_str(&format!("line {n}\n"));
        }
        source.push_str(&" ".repeat(indent));
        source.push_str(&line);
        let full = tokenize(&source).unwrap();

        let tail = &full[full.len() - standalone.len()..];
        let origin = Position::new(preceding, indent);
        for (alone, embedded) in standalone.iter().zip(tail) {
            prop_assert_eq!(alone.kind, embedded.kind);
            prop_assert_eq!(&alone.values, &embedded.values);
            prop_assert_eq!(alone.span.offset_by(origin), embedded.span);
        }
    }

    #[test]
    fn heading_nesting_matches_stack_model(levels in prop::collection::vec(1u8..=5, 1..12)) {
        let source: String = levels
            .iter()
            .enumerate()
            .map(|(i, level)| format!("{} h{i}\n", "#".repeat(usize::from(*level))))
            .collect();
        let root = parse_document(&source).unwrap();

        prop_assert_eq!(tree_parents(&root, levels.len()), stack_model(&levels));
    }
}

#[test]
fn stack_model_sanity() {
    assert_eq!(
        stack_model(&[1, 2, 3, 2, 1]),
        vec![None, Some(0), Some(1), Some(0), None]
    );
}

#[test]
fn quote_lines_form_one_quote() {
    let root = parse_document("> a\n> b\n").unwrap();
    assert_eq!(root.children.len(), 1);
    let quote = &root.children[0];
    assert_eq!(quote.kind(), TokenKind::Quote);
    let texts: Vec<_> = quote.children.iter().map(Node::flattened_text).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn hash_not_at_line_start_is_plain_text() {
    let root = parse_document("text # not a heading").unwrap();
    assert_eq!(root.children.len(), 1);
    let paragraph = &root.children[0];
    assert_eq!(paragraph.kind(), TokenKind::Paragraph);
    assert!(paragraph.children.is_empty());
    assert_eq!(paragraph.values.len(), 1);
    assert_eq!(paragraph.values[0].kind(), TokenKind::Text);
    assert_eq!(paragraph.values[0].token.value(), "text # not a heading");
}

#[test]
fn unmatched_carriage_return_reports_its_position() {
    let err = tokenize("# Title\n\nsome text\rmore").unwrap_err();
    assert_eq!(err.position(), Position::new(2, 9));
    assert_eq!(
        err.to_string(),
        "unrecognized token near \"\\rmore\" at [2:9]"
    );
}
