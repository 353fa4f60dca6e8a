//! # Quill Core
//!
//! The domain layer of the Quill blog service.
//! Entities, ports and the post lifecycle engine. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, FieldErrors};
pub use service::{ContentPipeline, PostService};
