//! HTML sanitizing via ammonia.

use ammonia::Builder;

use quill_core::ports::HtmlSanitizer;

/// Allow-list sanitizer built once and reused for every post.
///
/// Scripts, styles, iframes, event-handler attributes and `javascript:`
/// URLs are dropped. Links are forced to `rel="noopener noreferrer"`.
pub struct AmmoniaSanitizer {
    builder: Builder<'static>,
}

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .link_rel(Some("noopener noreferrer"))
            // task list checkboxes
            .add_tags(&["input"])
            .add_tag_attributes("input", &["type", "checked", "disabled"]);
        Self { builder }
    }
}

impl Default for AmmoniaSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}
