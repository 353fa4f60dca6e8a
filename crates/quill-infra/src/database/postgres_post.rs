//! PostgreSQL post repository.
//!
//! Likes are stored one row per `(post_id, email)` in `post_likes`, so the
//! "one like per email" rule is also a primary key.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Like, Post, PostContent};
use quill_core::error::RepoError;
use quill_core::ports::{PostFilter, PostRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as LikeEntity};
use super::postgres_base::{query_err, write_err};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Load the likes of `rows` in one query and assemble domain posts,
    /// keeping the order of `rows`.
    async fn attach_likes<C>(conn: &C, rows: Vec<post::Model>) -> Result<Vec<Post>, DbErr>
    where
        C: ConnectionTrait,
    {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let likes = LikeEntity::find()
            .filter(post_like::Column::PostId.is_in(ids))
            .order_by_asc(post_like::Column::CreatedAt)
            .all(conn)
            .await?;

        let mut by_post: HashMap<Uuid, Vec<post_like::Model>> = HashMap::new();
        for like in likes {
            by_post.entry(like.post_id).or_default().push(like);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let likes = by_post.remove(&row.id).unwrap_or_default();
                row.into_post(likes)
            })
            .collect())
    }

    async fn attach_one<C>(conn: &C, row: Option<post::Model>) -> Result<Option<Post>, RepoError>
    where
        C: ConnectionTrait,
    {
        match row {
            Some(row) => Ok(Self::attach_likes(conn, vec![row])
                .await
                .map_err(query_err)?
                .pop()),
            None => Ok(None),
        }
    }
}

/// Escape LIKE metacharacters so user text only ever matches literally.
fn like_pattern(text: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

fn contains_ignore_case(column: post::Column, text: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col((PostEntity, column)))).like(like_pattern(text))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Self::attach_one(&self.db, row).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .order_by_desc(post::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Self::attach_one(&self.db, row).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find()
            .filter(post::Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Self::attach_one(&self.db, row).await
    }

    async fn find_all(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find().order_by_desc(post::Column::CreatedAt);

        if let Some(user_id) = filter.user_id {
            query = query.filter(post::Column::UserId.eq(user_id));
        }
        if let Some(text) = &filter.text {
            query = query.filter(
                Condition::any()
                    .add(contains_ignore_case(post::Column::Title, text))
                    .add(contains_ignore_case(post::Column::Description, text)),
            );
        }

        let rows = query.all(&self.db).await.map_err(query_err)?;
        Self::attach_likes(&self.db, rows).await.map_err(query_err)
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let likes = post.likes.clone();
        let txn = self.db.begin().await.map_err(query_err)?;

        let row = post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(write_err)?;
        for like in likes {
            post_like::ActiveModel::for_post(row.id, like)
                .insert(&txn)
                .await
                .map_err(write_err)?;
        }

        let created = Self::attach_likes(&txn, vec![row])
            .await
            .map_err(query_err)?
            .pop()
            .ok_or(RepoError::NotFound)?;
        txn.commit().await.map_err(query_err)?;

        tracing::debug!(post_id = %created.id, "Inserted post");
        Ok(created)
    }

    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: PostContent,
    ) -> Result<Post, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(content.title))
            .col_expr(post::Column::Slug, Expr::value(content.slug))
            .col_expr(post::Column::Description, Expr::value(content.desc))
            .col_expr(post::Column::Body, Expr::value(content.body))
            .col_expr(
                post::Column::SanitizedHtml,
                Expr::value(content.sanitized_html),
            )
            .col_expr(
                post::Column::Version,
                Expr::col(post::Column::Version).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        if result.rows_affected == 0 {
            let exists = PostEntity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(query_err)?
                .is_some();
            tracing::debug!(post_id = %id, expected_version, exists, "Versioned update matched no row");
            return Err(if exists {
                RepoError::VersionMismatch
            } else {
                RepoError::NotFound
            });
        }

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    /// Runs under a row lock on the post so toggles for the same post
    /// serialize.
    async fn toggle_like(&self, id: Uuid, like: Like) -> Result<Option<Post>, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        let Some(row) = PostEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(query_err)?
        else {
            txn.rollback().await.map_err(query_err)?;
            return Ok(None);
        };

        let removed = LikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(id))
            .filter(post_like::Column::Email.eq(like.email.as_str()))
            .exec(&txn)
            .await
            .map_err(write_err)?;
        if removed.rows_affected == 0 {
            post_like::ActiveModel::for_post(id, like)
                .insert(&txn)
                .await
                .map_err(write_err)?;
        }

        let post = Self::attach_one(&txn, Some(row)).await?;
        txn.commit().await.map_err(query_err)?;
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
