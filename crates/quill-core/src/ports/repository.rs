use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Like, Post, PostContent, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Selection criteria for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Only posts created by this user.
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring of the title or the description.
    pub text: Option<String>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            text: None,
        }
    }

    /// Empty search text means no text filter. Anything else, whitespace
    /// included, is matched literally.
    pub fn containing(text: Option<&str>) -> Self {
        Self {
            user_id: None,
            text: text.filter(|t| !t.is_empty()).map(str::to_string),
        }
    }

    /// Evaluate the filter against a post held in memory.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(user_id) = self.user_id {
            if post.user_id != user_id {
                return false;
            }
        }
        match &self.text {
            Some(text) => {
                let needle = text.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.desc.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Post repository.
///
/// Every listing is ordered by `created_at` descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Distinct titles may share a slug. The newest such post wins.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Exact, case-sensitive title lookup.
    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError>;

    async fn find_all(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Overwrite the content fields of a post if its stored version still
    /// equals `expected_version`.
    ///
    /// Fails with `RepoError::VersionMismatch` when another write got there
    /// first and `RepoError::NotFound` when the post is gone.
    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: PostContent,
    ) -> Result<Post, RepoError>;

    /// Atomically add the like, or remove the existing like with the same
    /// email. Returns `None` if the post does not exist.
    async fn toggle_like(&self, id: Uuid, like: Like) -> Result<Option<Post>, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
