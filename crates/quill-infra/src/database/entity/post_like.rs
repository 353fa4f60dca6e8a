//! Like entity for SeaORM. One row per (post, email).

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::Like;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_likes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Like {
    fn from(model: Model) -> Self {
        Self {
            email: model.email,
            created_at: model.created_at.into(),
        }
    }
}

impl ActiveModel {
    pub fn for_post(post_id: Uuid, like: Like) -> Self {
        Self {
            post_id: Set(post_id),
            email: Set(like.email),
            created_at: Set(like.created_at.into()),
        }
    }
}
