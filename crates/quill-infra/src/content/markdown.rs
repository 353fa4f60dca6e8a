//! Markdown to HTML rendering via pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

use quill_core::ports::MarkupRenderer;

/// CommonMark renderer with the GitHub-flavoured extensions authors expect.
///
/// Raw HTML in the source is passed through untouched; the sanitizer is
/// responsible for it.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, self.options);
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
