//! Derivation of slug and render-safe HTML from author input.

use std::sync::Arc;

use crate::domain::{PostContent, PostInput};
use crate::error::DomainError;
use crate::ports::{HtmlSanitizer, MarkupRenderer, SlugGenerator};

use super::validation::validate_post_input;

/// Slug generator, renderer and sanitizer, built once at startup and shared.
#[derive(Clone)]
pub struct ContentPipeline {
    renderer: Arc<dyn MarkupRenderer>,
    sanitizer: Arc<dyn HtmlSanitizer>,
    slugs: Arc<dyn SlugGenerator>,
}

impl ContentPipeline {
    pub fn new(
        renderer: Arc<dyn MarkupRenderer>,
        sanitizer: Arc<dyn HtmlSanitizer>,
        slugs: Arc<dyn SlugGenerator>,
    ) -> Self {
        Self {
            renderer,
            sanitizer,
            slugs,
        }
    }

    pub fn slug(&self, title: &str) -> String {
        self.slugs.slugify(title)
    }

    /// Render the body and sanitize the result. There is no path that
    /// returns rendered markup without the sanitizer having seen it.
    pub fn render_safe(&self, body: &str) -> String {
        let rendered = self.renderer.render(body);
        self.sanitizer.sanitize(&rendered)
    }

    /// Validate `input` and derive every computed field from it.
    ///
    /// A title that yields an empty slug is rejected as a title error.
    pub fn prepare(&self, input: PostInput) -> Result<PostContent, DomainError> {
        let mut validation = validate_post_input(&input.title, &input.desc, &input.body);

        let slug = self.slug(&input.title);
        if slug.is_empty() && !validation.errors.contains_key("title") {
            validation.errors.insert(
                "title",
                "Title must contain at least one letter or digit".to_string(),
            );
        }
        validation.into_result()?;

        let sanitized_html = self.render_safe(&input.body);
        Ok(PostContent {
            title: input.title,
            slug,
            desc: input.desc,
            body: input.body,
            sanitized_html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;
    impl MarkupRenderer for Upper {
        fn render(&self, markup: &str) -> String {
            format!("<p>{}</p>", markup.to_uppercase())
        }
    }

    struct StripScript;
    impl HtmlSanitizer for StripScript {
        fn sanitize(&self, html: &str) -> String {
            html.replace("<SCRIPT>", "")
        }
    }

    struct Dashed;
    impl SlugGenerator for Dashed {
        fn slugify(&self, title: &str) -> String {
            title
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|part| !part.is_empty())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join("-")
        }
    }

    fn pipeline() -> ContentPipeline {
        ContentPipeline::new(Arc::new(Upper), Arc::new(StripScript), Arc::new(Dashed))
    }

    #[test]
    fn prepare_renders_then_sanitizes() {
        let content = pipeline()
            .prepare(PostInput::new("Hello World", "desc", "<script>hi"))
            .unwrap();

        assert_eq!(content.slug, "hello-world");
        assert_eq!(content.sanitized_html, "<p>HI</p>");
        assert_eq!(content.body, "<script>hi");
    }

    #[test]
    fn slugless_title_is_a_title_error() {
        let err = pipeline()
            .prepare(PostInput::new("***", "desc", "body"))
            .unwrap_err();

        match err {
            DomainError::InvalidInput { errors } => {
                assert_eq!(
                    errors["title"],
                    "Title must contain at least one letter or digit"
                );
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn blank_title_keeps_the_emptiness_message() {
        let err = pipeline()
            .prepare(PostInput::new("  ", "", "body"))
            .unwrap_err();

        match err {
            DomainError::InvalidInput { errors } => {
                assert_eq!(errors["title"], "Title must not be empty");
                assert!(errors.contains_key("desc"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
