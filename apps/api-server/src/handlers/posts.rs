//! Post handlers. Each one is a thin binding over [`PostService`].
//!
//! [`PostService`]: quill_core::PostService

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_shared::ApiResponse;
use quill_shared::dto::{PostRequest, PostResponse, SearchQuery};

use crate::middleware::auth::Credentials;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_responses(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::from).collect()
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.get_posts().await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

/// GET /api/posts/search?filter=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.search_posts(query.filter.as_deref()).await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

/// GET /api/posts/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(&slug).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// GET /api/posts/{id}
pub async fn get_by_id(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post_for_update(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// GET /api/users/{id}/posts
pub async fn by_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.get_user_posts(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    credentials: Credentials,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create_post(&credentials, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    credentials: Credentials,
    post_id: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update_post(&credentials, post_id.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    credentials: Credentials,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    state.posts.delete_post(&credentials, post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_id,
        "Post deleted successfully",
    )))
}

/// POST /api/posts/{id}/like
pub async fn like(
    state: web::Data<AppState>,
    credentials: Credentials,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .like_post(&credentials, post_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}
