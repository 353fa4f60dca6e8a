//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - in-memory repositories only

pub mod auth;
pub mod content;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use content::{AmmoniaSanitizer, AsciiSlugGenerator, MarkdownRenderer, default_pipeline};
pub use database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};
