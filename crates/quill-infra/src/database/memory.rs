//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Like, Post, PostContent, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostFilter, PostRepository, UserRepository};

use super::mask_email;

/// Post store backed by a `Vec` in insertion order.
///
/// Every read-modify-write runs under one write lock, so like toggles and
/// versioned updates are atomic.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching posts, newest first. Ties keep the later insert first.
    fn select(posts: &[Post], filter: &PostFilter) -> Vec<Post> {
        let mut selected: Vec<Post> = posts
            .iter()
            .rev()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(Self::select(&posts, &PostFilter::all())
            .into_iter()
            .find(|post| post.slug == slug))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.title == title).cloned())
    }

    async fn find_all(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(Self::select(&posts, filter))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|existing| existing.id == post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: PostContent,
    ) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;

        if post.version != expected_version {
            return Err(RepoError::VersionMismatch);
        }
        post.apply(content);
        Ok(post.clone())
    }

    async fn toggle_like(&self, id: Uuid, like: Like) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        Ok(posts.iter_mut().find(|post| post.id == id).map(|post| {
            post.toggle_like(like);
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// User store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id)
        {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use quill_core::ports::Caller;

    fn post(title: &str) -> Post {
        let author = Caller {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            fullname: "Ada".to_string(),
        };
        Post::new(
            &author,
            PostContent {
                title: title.to_string(),
                slug: title.to_lowercase(),
                desc: "desc".to_string(),
                body: "body".to_string(),
                sanitized_html: "<p>body</p>".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn find_all_orders_newest_first() {
        let repo = InMemoryPostRepository::new();
        let mut old = post("old");
        old.created_at = Utc::now() - Duration::hours(1);
        repo.insert(old).await.unwrap();
        repo.insert(post("new")).await.unwrap();

        let titles: Vec<_> = repo
            .find_all(&PostFilter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, ["new", "old"]);
    }

    #[tokio::test]
    async fn update_content_checks_version() {
        let repo = InMemoryPostRepository::new();
        let created = repo.insert(post("first")).await.unwrap();
        let content = PostContent {
            title: "second".to_string(),
            slug: "second".to_string(),
            desc: "desc".to_string(),
            body: "body".to_string(),
            sanitized_html: "<p>body</p>".to_string(),
        };

        let updated = repo
            .update_content(created.id, 1, content.clone())
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.title, "second");

        let stale = repo.update_content(created.id, 1, content.clone()).await;
        assert!(matches!(stale, Err(RepoError::VersionMismatch)));

        let missing = repo.update_content(Uuid::new_v4(), 1, content).await;
        assert!(matches!(missing, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn concurrent_toggles_from_different_users_all_land() {
        let repo = std::sync::Arc::new(InMemoryPostRepository::new());
        let id = repo.insert(post("popular")).await.unwrap().id;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.toggle_like(id, Like::new(format!("user{i}@example.com")))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let post = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(post.likes.len(), 16);
    }

    #[tokio::test]
    async fn toggle_like_on_missing_post_is_none() {
        let repo = InMemoryPostRepository::new();
        let result = repo
            .toggle_like(Uuid::new_v4(), Like::new("a@example.com"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn user_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        let first = User::new("ada@example.com".into(), "Ada".into(), "hash".into());
        repo.save(first.clone()).await.unwrap();

        let duplicate = User::new("ada@example.com".into(), "Other".into(), "hash".into());
        assert!(matches!(
            repo.save(duplicate).await,
            Err(RepoError::Constraint(_))
        ));

        let found = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }
}
