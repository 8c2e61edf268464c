//! # blogmark-engine
//!
//! Renders blogmark documents to HTML fragments.
//!
//! ```text
//! source ──tokenize──▶ tokens ──build──▶ Node tree ──render──▶ HTML + TOC
//! ```
//!
//! Tokenizing and tree building live in `blogmark-syntax`; this crate owns
//! the [`Renderer`], the table of contents and the link-preview boundary
//! ([`preview`]). The output is a fragment for a page template, never a
//! complete HTML document.
//!
//! ```
//! use blogmark_config::Config;
//! use blogmark_engine::{Renderer, render_document};
//!
//! let renderer = Renderer::new(&Config::default());
//! let page = render_document("# Hello\nworld", &renderer).unwrap();
//!
//! assert_eq!(
//!     page.html,
//!     r#"<section class="heading-1"><h1 id="hello">Hello</h1><p>world</p></section>"#
//! );
//! assert_eq!(page.toc, r##"<ul><li><a href="#hello">Hello</a></li></ul>"##);
//! ```

pub mod preview;
pub mod render;

pub use blogmark_syntax::SyntaxError;
pub use render::Renderer;

/// The two fragments handed to a page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    /// Table of contents; empty when the document has no headings.
    pub toc: String,
}

/// Tokenize, build and render one document.
///
/// Only a tokenizer failure is reported; preview problems degrade to bare
/// links.
pub fn render_document(
    source: &str,
    renderer: &Renderer,
) -> Result<RenderedDocument, SyntaxError> {
    let root = blogmark_syntax::parse_document(source)?;
    Ok(RenderedDocument {
        html: renderer.render(&root),
        toc: renderer.table_of_contents(&root),
    })
}
