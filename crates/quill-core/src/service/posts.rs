//! Post lifecycle engine.
//!
//! Mutations resolve the caller first, then validate input, then apply the
//! uniqueness and ownership rules, and only then write through the store.
//! Queries read straight through the store.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Like, Post, PostInput};
use crate::error::{DomainError, RepoError};
use crate::ports::{IdentityResolver, PostFilter, PostRepository};

use super::content::ContentPipeline;

/// Message attached to the title field when a create reuses a title.
pub const TITLE_TAKEN: &str = "This title is already taken.";

/// Create, update, delete, like and query posts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    content: ContentPipeline,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, content: ContentPipeline) -> Self {
        Self { posts, content }
    }

    /// All posts, newest first.
    pub async fn get_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all(&PostFilter::all()).await?)
    }

    pub async fn get_post(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::post_not_found(slug))
    }

    /// Posts whose title or description contains `filter`, ignoring case.
    /// No filter returns every post.
    pub async fn search_posts(&self, filter: Option<&str>) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all(&PostFilter::containing(filter)).await?)
    }

    pub async fn get_post_for_update(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// Posts created by `user_id`, newest first.
    pub async fn get_user_posts(&self, user_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all(&PostFilter::by_user(user_id)).await?)
    }

    pub async fn create_post(
        &self,
        auth: &dyn IdentityResolver,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let caller = auth.resolve()?;
        let content = self.content.prepare(input)?;

        if self.posts.find_by_title(&content.title).await?.is_some() {
            return Err(DomainError::Conflict {
                field: "title",
                message: TITLE_TAKEN.to_string(),
            });
        }

        let post = self.posts.insert(Post::new(&caller, content)).await?;
        tracing::info!(post_id = %post.id, user_id = %caller.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Replace title, description and body. Title uniqueness is only
    /// enforced at creation.
    pub async fn update_post(
        &self,
        auth: &dyn IdentityResolver,
        post_id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let caller = auth.resolve()?;
        let content = self.content.prepare(input)?;

        let existing = self.get_post_for_update(post_id).await?;
        if !existing.is_owned_by(&caller) {
            tracing::warn!(%post_id, user_id = %caller.id, "Update rejected: not the owner");
            return Err(DomainError::Forbidden);
        }

        let post = self
            .posts
            .update_content(post_id, existing.version, content)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::post_not_found(post_id),
                RepoError::VersionMismatch => DomainError::Stale {
                    entity_type: "Post",
                    id: post_id,
                },
                other => other.into(),
            })?;
        tracing::info!(%post_id, version = post.version, "Post updated");
        Ok(post)
    }

    pub async fn delete_post(
        &self,
        auth: &dyn IdentityResolver,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        let caller = auth.resolve()?;

        let existing = self.get_post_for_update(post_id).await?;
        if !existing.is_owned_by(&caller) {
            tracing::warn!(%post_id, user_id = %caller.id, "Delete rejected: not the owner");
            return Err(DomainError::Forbidden);
        }

        self.posts.delete(post_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(post_id),
            other => other.into(),
        })?;
        tracing::info!(%post_id, "Post deleted");
        Ok(())
    }

    /// Like the post, or take back the caller's existing like.
    pub async fn like_post(
        &self,
        auth: &dyn IdentityResolver,
        post_id: Uuid,
    ) -> Result<Post, DomainError> {
        let caller = auth.resolve()?;

        let post = self
            .posts
            .toggle_like(post_id, Like::new(caller.email.as_str()))
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        tracing::debug!(
            %post_id,
            liked = post.is_liked_by(&caller.email),
            likes = post.likes.len(),
            "Like toggled"
        );
        Ok(post)
    }
}
