//! Use-case services built on top of the ports.

mod content;
mod posts;
pub mod validation;

pub use content::ContentPipeline;
pub use posts::{PostService, TITLE_TAKEN};
pub use validation::{Validation, validate_post_input, validate_registration};
