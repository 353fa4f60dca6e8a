//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::Post;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(column_type = "Text")]
    pub sanitized_html: String,
    pub user_id: Uuid,
    pub email: String,
    pub fullname: String,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_like::Entity")]
    Like,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Like.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain post from its row and its like rows.
    pub fn into_post(self, likes: Vec<super::post_like::Model>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            slug: self.slug,
            desc: self.description,
            body: self.body,
            sanitized_html: self.sanitized_html,
            user_id: self.user_id,
            email: self.email,
            fullname: self.fullname,
            likes: likes.into_iter().map(Into::into).collect(),
            version: self.version,
            created_at: self.created_at.into(),
        }
    }
}

/// Likes live in `post_likes` and are not part of the row.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            slug: Set(post.slug),
            description: Set(post.desc),
            body: Set(post.body),
            sanitized_html: Set(post.sanitized_html),
            user_id: Set(post.user_id),
            email: Set(post.email),
            fullname: Set(post.fullname),
            version: Set(post.version),
            created_at: Set(post.created_at.into()),
        }
    }
}
