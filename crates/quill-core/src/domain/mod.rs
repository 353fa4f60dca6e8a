//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{Like, Post, PostContent, PostInput};
pub use user::User;
