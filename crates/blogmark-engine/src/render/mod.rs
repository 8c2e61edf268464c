//! # Renderer
//!
//! Walks a [`Node`] tree once and appends HTML to a single buffer. For every
//! node the inline *values* are written first, then the block *children*:
//!
//! | node | HTML |
//! |---|---|
//! | text, bold, italic, inline code | escaped text, `<strong>`, `<em>`, `<code>` |
//! | link | `<a href>`, plus a preview card for recognised providers |
//! | heading | `<section class="heading-N">` around `<hN id="slug">` and its content |
//! | list items | `<li>`, consecutive items grouped in one `<ul>` |
//! | paragraph | `<p>`, indented content in `<div class="nested">` |
//! | code block | `<figure class="code-block">` with caption and escaped code |
//! | quote / callout | `<blockquote>` / `<div class="callout …">` |
//! | frontmatter | `<header class="frontmatter">` with title, date, tags and TOC |
//!
//! Rendering never fails. A link whose preview cannot be fetched renders as
//! a bare anchor.

mod code;
mod toc;

use blogmark_config::{Config, ProviderToggles};
use blogmark_syntax::{CalloutKind, Node, Token, TokenKind};
use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

use crate::preview::{PreviewCard, PreviewClient, PreviewRequest, Provider};

pub use code::CodeInfo;
pub use toc::{heading_slug, slug};

/// Turns document trees into HTML fragments.
pub struct Renderer {
    toc_depth: u8,
    toggles: ProviderToggles,
    previews: Option<PreviewClient>,
}

impl Renderer {
    /// A renderer that never fetches link previews.
    pub fn new(config: &Config) -> Self {
        Self {
            toc_depth: config.toc.max_depth,
            toggles: config.preview.providers,
            previews: None,
        }
    }

    /// A renderer that fetches previews through `client`, unless previews are
    /// disabled in `config`.
    pub fn with_previews(config: &Config, client: PreviewClient) -> Self {
        Self {
            previews: config.preview.enabled.then_some(client),
            ..Self::new(config)
        }
    }

    pub fn render(&self, root: &Node) -> String {
        let mut html = Html {
            renderer: self,
            root,
            out: String::new(),
            deferred_cards: None,
        };
        html.traverse(root);
        html.out
    }

    /// Table of contents over the document's headings; empty without headings.
    pub fn table_of_contents(&self, root: &Node) -> String {
        let mut out = String::new();
        toc::write_toc(root, self.toc_depth, &mut out);
        out
    }

    fn link_preview(&self, url: &str) -> Option<PreviewCard> {
        let client = self.previews.as_ref()?;
        let request = PreviewRequest::parse(url)?;
        if !request.provider().enabled_in(&self.toggles) {
            return None;
        }
        client.preview(&request)
    }
}

/// One render pass.
struct Html<'r> {
    renderer: &'r Renderer,
    root: &'r Node,
    out: String,
    /// Preview cards held back until the enclosing `<p>` or `<hN>` closes.
    deferred_cards: Option<Vec<PreviewCard>>,
}

impl Html<'_> {
    fn traverse(&mut self, node: &Node) {
        self.values(node);
        self.blocks(&node.children);
    }

    fn values(&mut self, node: &Node) {
        for value in &node.values {
            self.inline(value);
        }
    }

    /// Values of an element that only allows phrasing content. Preview
    /// cards found there are written right after `close`.
    fn phrasing_values(&mut self, node: &Node, close: &str) {
        let outer = self.deferred_cards.replace(Vec::new());
        self.values(node);
        self.out.push_str(close);
        let cards = std::mem::replace(&mut self.deferred_cards, outer).unwrap_or_default();
        for card in cards {
            card.write_html(&mut self.out);
        }
    }

    fn text(&mut self, text: &str) {
        encode_text_to_string(text, &mut self.out);
    }

    fn attribute(&mut self, value: &str) {
        encode_double_quoted_attribute_to_string(value, &mut self.out);
    }

    fn wrapped(&mut self, tag: &str, text: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.text(text);
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn inline(&mut self, node: &Node) {
        let token = &node.token;
        match token.kind {
            TokenKind::Text => self.text(token.value()),
            TokenKind::BoldText => self.wrapped("strong", token.value()),
            TokenKind::ItalicText => self.wrapped("em", token.value()),
            TokenKind::InlineCode => self.wrapped("code", token.value()),
            TokenKind::Link => self.link(token),
            TokenKind::Document
            | TokenKind::Frontmatter
            | TokenKind::Heading(_)
            | TokenKind::Callout(_)
            | TokenKind::Quote
            | TokenKind::HyphenList
            | TokenKind::NumberedList
            | TokenKind::CodeBlock
            | TokenKind::Paragraph => self.block(node),
        }
    }

    /// Block children, with runs of list items of one kind wrapped in a list.
    fn blocks(&mut self, children: &[Node]) {
        let mut open_list = None;
        for child in children {
            let list = matches!(child.kind(), TokenKind::HyphenList | TokenKind::NumberedList)
                .then_some(child.kind());
            if list != open_list {
                if open_list.is_some() {
                    self.out.push_str("</ul>");
                }
                match list {
                    Some(TokenKind::NumberedList) => {
                        self.out.push_str(r#"<ul class="numbered-list">"#)
                    }
                    Some(_) => self.out.push_str("<ul>"),
                    None => {}
                }
                open_list = list;
            }
            self.block(child);
        }
        if open_list.is_some() {
            self.out.push_str("</ul>");
        }
    }

    fn block(&mut self, node: &Node) {
        match node.kind() {
            TokenKind::Frontmatter => self.frontmatter(&node.token),
            TokenKind::Heading(level) => self.heading(node, level),
            TokenKind::HyphenList | TokenKind::NumberedList => self.list_item(node),
            TokenKind::Paragraph => self.paragraph(node),
            TokenKind::CodeBlock => self.code_block(&node.token),
            TokenKind::Quote => self.quote(node),
            TokenKind::Callout(kind) => self.callout(node, kind),
            TokenKind::Document => self.traverse(node),
            TokenKind::Text
            | TokenKind::Link
            | TokenKind::InlineCode
            | TokenKind::BoldText
            | TokenKind::ItalicText => {
                self.inline(node);
                self.blocks(&node.children);
            }
        }
    }

    fn heading(&mut self, node: &Node, level: u8) {
        let slug = heading_slug(node);
        self.out.push_str(&format!(r#"<section class="heading-{level}"><h{level}"#));
        if !slug.is_empty() {
            self.out.push_str(r#" id=""#);
            self.attribute(&slug);
            self.out.push('"');
        }
        self.out.push('>');
        self.phrasing_values(node, &format!("</h{level}>"));
        self.blocks(&node.children);
        self.out.push_str("</section>");
    }

    fn list_item(&mut self, node: &Node) {
        self.out.push_str("<li>");
        if node.kind() == TokenKind::NumberedList {
            self.out.push_str(r#"<span class="list-marker">"#);
            self.text(node.token.value().trim());
            self.out.push_str("</span>");
        }
        self.traverse(node);
        self.out.push_str("</li>");
    }

    fn paragraph(&mut self, node: &Node) {
        self.out.push_str("<p>");
        self.phrasing_values(node, "</p>");
        if !node.children.is_empty() {
            self.out.push_str(r#"<div class="nested">"#);
            self.blocks(&node.children);
            self.out.push_str("</div>");
        }
    }

    fn code_block(&mut self, token: &Token) {
        let info = CodeInfo::from_tag(token.value());
        let code = token.values.get(1).map_or("", String::as_str);

        if info.caption.is_empty() {
            self.out.push_str(r#"<figure class="code-block">"#);
        } else {
            self.out.push_str(r#"<figure class="code-block" data-lang=""#);
            self.attribute(&info.language);
            self.out.push_str(r#""><figcaption>"#);
            self.text(&info.caption);
            self.out.push_str("</figcaption>");
        }
        self.out.push_str("<pre><code>");
        self.text(code);
        self.out.push_str("</code></pre></figure>");
    }

    fn quote(&mut self, node: &Node) {
        self.out.push_str("<blockquote>");
        self.traverse(node);
        self.out.push_str("</blockquote>");
    }

    fn callout(&mut self, node: &Node, kind: CalloutKind) {
        self.out.push_str(r#"<div class="callout callout-"#);
        self.out.push_str(kind.name());
        self.out.push_str(r#""><p class="callout-title">"#);
        if node.values.is_empty() {
            self.out.push_str(kind.label());
            self.out.push_str("</p>");
        } else {
            self.phrasing_values(node, "</p>");
        }
        self.blocks(&node.children);
        self.out.push_str("</div>");
    }

    fn frontmatter(&mut self, token: &Token) {
        let mut title = None;
        let mut date = None;
        let mut tags: Vec<&str> = Vec::new();
        for pair in token.values.chunks_exact(2) {
            match pair[0].as_str() {
                "id" => title = Some(pair[1].as_str()),
                "date" => date = Some(pair[1].as_str()),
                "tags" => tags = pair[1].split(',').filter(|t| !t.is_empty()).collect(),
                _ => {}
            }
        }

        self.out.push_str(r#"<header class="frontmatter">"#);
        if let Some(title) = title {
            self.out.push_str(r#"<h1 class="title">"#);
            self.text(title);
            self.out.push_str("</h1>");
        }
        if let Some(date) = date {
            self.out.push_str("<time>");
            self.text(date);
            self.out.push_str("</time>");
        }
        if !tags.is_empty() {
            self.out.push_str(r#"<ul class="tags">"#);
            for tag in tags {
                self.out.push_str("<li>");
                self.text(tag);
                self.out.push_str("</li>");
            }
            self.out.push_str("</ul>");
        }
        let toc = self.renderer.table_of_contents(self.root);
        if !toc.is_empty() {
            self.out.push_str(r#"<nav class="toc">"#);
            self.out.push_str(&toc);
            self.out.push_str("</nav>");
        }
        self.out.push_str("</header>");
    }

    fn link(&mut self, token: &Token) {
        let url = token.values.get(1).map_or("", String::as_str);
        let provider = Provider::detect(url);

        self.out.push_str(r#"<a href=""#);
        self.attribute(url);
        self.out.push('"');
        if let Some(provider) = provider {
            self.out.push_str(r#" data-provider=""#);
            self.out.push_str(provider.name());
            self.out.push('"');
        }
        self.out.push('>');
        self.text(token.value());
        self.out.push_str("</a>");

        let Some(card) = provider.and_then(|_| self.renderer.link_preview(url)) else {
            return;
        };
        match self.deferred_cards.as_mut() {
            Some(cards) => cards.push(card),
            None => card.write_html(&mut self.out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogmark_syntax::parse_document;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        let root = parse_document(source).unwrap();
        Renderer::new(&Config::default()).render(&root)
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn inline_kinds() {
        assert_eq!(
            render("a **b** _c_ `<d>`"),
            "<p>a <strong>b</strong> <em>c</em> <code>&lt;d&gt;</code></p>"
        );
    }

    #[test]
    fn plain_link_is_bare_anchor() {
        assert_eq!(
            render("[hi](https://example.com)"),
            r#"<p><a href="https://example.com">hi</a></p>"#
        );
    }

    #[test]
    fn known_provider_is_tagged_without_preview() {
        assert_eq!(
            render("[video](https://www.youtube.com/watch?v=abc)"),
            r#"<p><a href="https://www.youtube.com/watch?v=abc" data-provider="youtube">video</a></p>"#
        );
    }

    #[test]
    fn heading_wraps_its_section() {
        assert_eq!(
            render("## Getting Started\nbody"),
            r#"<section class="heading-2"><h2 id="getting-started">Getting Started</h2><p>body</p></section>"#
        );
    }

    #[test]
    fn list_items_are_grouped() {
        assert_eq!(
            render("- a\n- b\n  - c\n1. one\n2. two"),
            concat!(
                "<ul><li>a</li><li>b<ul><li>c</li></ul></li></ul>",
                r#"<ul class="numbered-list">"#,
                r#"<li><span class="list-marker">1.</span>one</li>"#,
                r#"<li><span class="list-marker">2.</span>two</li>"#,
                "</ul>",
            )
        );
    }

    #[test]
    fn indented_paragraph_nests() {
        assert_eq!(
            render("intro\n  detail"),
            r#"<p>intro</p><div class="nested"><p>detail</p></div>"#
        );
    }

    #[test]
    fn code_block_is_escaped_verbatim() {
        assert_eq!(
            render("```html\n<b>x</b>\n```"),
            concat!(
                r#"<figure class="code-block" data-lang="html"><figcaption>Html</figcaption>"#,
                "<pre><code>&lt;b&gt;x&lt;/b&gt;</code></pre></figure>",
            )
        );
    }

    #[test]
    fn code_block_without_tag() {
        assert_eq!(
            render("```\nplain\n```"),
            r#"<figure class="code-block"><pre><code>plain</code></pre></figure>"#
        );
    }

    #[test]
    fn quote_lines_share_one_blockquote() {
        assert_eq!(
            render("> a\n> b\n"),
            "<blockquote><p>a</p><p>b</p></blockquote>"
        );
    }

    #[test]
    fn callout_uses_default_caption() {
        assert_eq!(
            render("> [!IMPORTANT]\n> Read this"),
            r#"<div class="callout callout-important"><p class="callout-title">Important</p><p>Read this</p></div>"#
        );
    }

    #[test]
    fn callout_uses_inline_caption() {
        assert_eq!(
            render("> [!NOTE] Heads **up**"),
            r#"<div class="callout callout-note"><p class="callout-title">Heads <strong>up</strong></p></div>"#
        );
    }

    #[test]
    fn hash_mid_line_renders_as_paragraph() {
        assert_eq!(render("text # not a heading"), "<p>text # not a heading</p>");
    }

    #[test]
    fn frontmatter_header_with_toc() {
        let html = render(
            "---\nid: \"Hello & welcome\"\ndate: 2024-05-01\ntags:\n  - rust\n  - web\n---\n# Intro\n## Setup",
        );
        assert_snapshot!(html, @r##"<header class="frontmatter"><h1 class="title">Hello &amp; welcome</h1><time>2024-05-01</time><ul class="tags"><li>rust</li><li>web</li></ul><nav class="toc"><ul><li><a href="#intro">Intro</a><ul><li><a href="#setup">Setup</a></li></ul></li></ul></nav></header><section class="heading-1"><h1 id="intro">Intro</h1><section class="heading-2"><h2 id="setup">Setup</h2></section></section>"##);
    }

    #[test]
    fn quoted_code_block_keeps_following_paragraph_outside() {
        assert_eq!(
            render("> ```rust\n> let x = 1;\n> ```\n\nAfter paragraph"),
            concat!(
                "<blockquote>",
                r#"<figure class="code-block" data-lang="rust"><figcaption>Rust</figcaption>"#,
                "<pre><code>let x = 1;</code></pre></figure>",
                "</blockquote>",
                "<p>After paragraph</p>",
            )
        );
    }

    #[test]
    fn empty_heading_has_no_anchor() {
        assert_eq!(
            render("# \ntext"),
            r#"<section class="heading-1"><h1></h1><p>text</p></section>"#
        );
    }

    #[test]
    fn table_of_contents_respects_depth() {
        let mut config = Config::default();
        config.toc.max_depth = 1;
        let root = parse_document("# A\n## B").unwrap();
        assert_eq!(
            Renderer::new(&config).table_of_contents(&root),
            r##"<ul><li><a href="#a">A</a></li></ul>"##
        );
    }
}
