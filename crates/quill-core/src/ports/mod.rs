//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod content;
mod repository;

pub use auth::{
    Anonymous, AuthError, Caller, IdentityResolver, PasswordService, TokenClaims, TokenService,
};
pub use content::{HtmlSanitizer, MarkupRenderer, SlugGenerator};
pub use repository::{BaseRepository, PostFilter, PostRepository, UserRepository};
