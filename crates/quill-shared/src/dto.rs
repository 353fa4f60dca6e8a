//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{Like, Post, PostInput, User};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub fullname: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            fullname: user.fullname,
        }
    }
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub body: String,
}

impl From<PostRequest> for PostInput {
    fn from(req: PostRequest) -> Self {
        PostInput::new(req.title, req.desc, req.body)
    }
}

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeResponse {
    fn from(like: Like) -> Self {
        Self {
            email: like.email,
            created_at: like.created_at,
        }
    }
}

/// A post as exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub desc: String,
    pub body: String,
    pub sanitized_html: String,
    pub user: Uuid,
    pub email: String,
    pub fullname: String,
    pub likes: Vec<LikeResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            desc: post.desc,
            body: post.body,
            sanitized_html: post.sanitized_html,
            user: post.user_id,
            email: post.email,
            fullname: post.fullname,
            likes: post.likes.into_iter().map(Into::into).collect(),
            created_at: post.created_at,
        }
    }
}
