//! Heading anchors and the table of contents.

use blogmark_syntax::Node;
use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

/// Anchor id for a heading: its text lower-cased, trimmed, whitespace runs
/// replaced by `-`.
///
/// ```
/// use blogmark_engine::render::slug;
///
/// assert_eq!(slug("  Getting Started "), "getting-started");
/// assert_eq!(slug("API  v2"), "api-v2");
/// ```
pub fn slug(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug of a heading node's flattened text.
pub fn heading_slug(heading: &Node) -> String {
    slug(&heading.flattened_text())
}

/// Nested `<ul>` of links to every heading reachable through headings from
/// `node`, skipping levels deeper than `max_depth`. A heading without text
/// has no anchor; its sub-headings take its place.
pub fn write_toc(node: &Node, max_depth: u8, out: &mut String) {
    let mut entries = Vec::new();
    collect_entries(node, max_depth, &mut entries);
    if entries.is_empty() {
        return;
    }

    out.push_str("<ul>");
    for (heading, slug) in entries {
        out.push_str(r##"<li><a href="#"##);
        encode_double_quoted_attribute_to_string(slug, out);
        out.push_str(r#"">"#);
        encode_text_to_string(heading.flattened_text(), out);
        out.push_str("</a>");
        write_toc(heading, max_depth, out);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn collect_entries<'n>(node: &'n Node, max_depth: u8, entries: &mut Vec<(&'n Node, String)>) {
    for child in &node.children {
        if !child
            .kind()
            .heading_level()
            .is_some_and(|level| level <= max_depth)
        {
            continue;
        }
        let slug = heading_slug(child);
        if slug.is_empty() {
            collect_entries(child, max_depth, entries);
        } else {
            entries.push((child, slug));
        }
    }
}
