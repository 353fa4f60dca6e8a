use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::Caller;

/// A single like reaction, keyed by the liker's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

/// Author-supplied fields of a post, as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub desc: String,
    pub body: String,
}

impl PostInput {
    pub fn new(
        title: impl Into<String>,
        desc: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            desc: desc.into(),
            body: body.into(),
        }
    }
}

/// Content fields of a post together with the values derived from them.
///
/// This is the only shape in which content reaches the store, so `slug` and
/// `sanitized_html` are always written alongside the fields they come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub slug: String,
    pub desc: String,
    pub body: String,
    pub sanitized_html: String,
}

/// Post entity - a blog post with its like reactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub desc: String,
    pub body: String,
    pub sanitized_html: String,
    pub user_id: Uuid,
    pub email: String,
    pub fullname: String,
    pub likes: Vec<Like>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author`.
    pub fn new(author: &Caller, content: PostContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: content.title,
            slug: content.slug,
            desc: content.desc,
            body: content.body,
            sanitized_html: content.sanitized_html,
            user_id: author.id,
            email: author.email.clone(),
            fullname: author.fullname.clone(),
            likes: Vec::new(),
            version: 1,
            created_at: Utc::now(),
        }
    }

    /// Ownership is decided by the email snapshot taken at creation.
    pub fn is_owned_by(&self, caller: &Caller) -> bool {
        self.email == caller.email
    }

    /// Replace the content fields and bump the version.
    ///
    /// Owner snapshot, likes and `created_at` are left as they are.
    pub fn apply(&mut self, content: PostContent) {
        self.title = content.title;
        self.slug = content.slug;
        self.desc = content.desc;
        self.body = content.body;
        self.sanitized_html = content.sanitized_html;
        self.version += 1;
    }

    /// Add `like` if its email has not liked the post yet, otherwise remove
    /// the existing like for that email. Returns true when the post ends up
    /// liked by that email.
    pub fn toggle_like(&mut self, like: Like) -> bool {
        let before = self.likes.len();
        self.likes.retain(|existing| existing.email != like.email);
        if self.likes.len() < before {
            return false;
        }
        self.likes.push(like);
        true
    }

    pub fn is_liked_by(&self, email: &str) -> bool {
        self.likes.iter().any(|like| like.email == email)
    }
}
