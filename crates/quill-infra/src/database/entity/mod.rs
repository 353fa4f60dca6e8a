//! SeaORM entities for the `users`, `posts` and `post_likes` tables.

pub mod post;
pub mod post_like;
pub mod user;
