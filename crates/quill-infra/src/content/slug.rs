//! URL slug derivation.

use quill_core::ports::SlugGenerator;

/// Lowercase ASCII slugs with `-` between words.
///
/// Every run of characters other than ASCII letters and digits becomes one
/// separator; separators never lead or trail. Non-ASCII letters are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiSlugGenerator;

impl SlugGenerator for AsciiSlugGenerator {
    fn slugify(&self, title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        let mut pending_separator = false;

        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }

        slug
    }
}
