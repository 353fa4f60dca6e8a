//! Content processing ports.
//!
//! All three are pure functions behind a trait so the engine can be handed
//! one process-wide instance of each.

/// Renders lightweight markup source (Markdown) to HTML.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, source: &str) -> String;
}

/// Strips elements and attributes that could execute code from HTML.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Derives a URL-safe identifier from a title.
///
/// Must be total: titles with nothing usable produce an empty string.
pub trait SlugGenerator: Send + Sync {
    fn slugify(&self, title: &str) -> String;
}
