//! Post and user stores: PostgreSQL via SeaORM, plus in-memory fallbacks.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_post;
#[cfg(feature = "postgres")]
mod postgres_user;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_post::PostgresPostRepository;
#[cfg(feature = "postgres")]
pub use postgres_user::PostgresUserRepository;


/// Mask the local part of an email so logs carry no PII.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match (chars.next(), chars.next()) {
                (Some(first), Some(_)) => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            }
        }
        None => "***".to_string(),
    }
}
