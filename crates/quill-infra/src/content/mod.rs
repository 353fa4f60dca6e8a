//! Content processing: Markdown rendering, HTML sanitizing and slugs.

mod markdown;
mod sanitizer;
mod slug;

use std::sync::Arc;

use quill_core::ContentPipeline;

pub use markdown::MarkdownRenderer;
pub use sanitizer::AmmoniaSanitizer;
pub use slug::AsciiSlugGenerator;

/// The pipeline the server runs with: CommonMark, ammonia, ASCII slugs.
pub fn default_pipeline() -> ContentPipeline {
    ContentPipeline::new(
        Arc::new(MarkdownRenderer::new()),
        Arc::new(AmmoniaSanitizer::new()),
        Arc::new(AsciiSlugGenerator),
    )
}
