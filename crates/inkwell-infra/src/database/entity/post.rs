//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use inkwell_core::domain::{Post, Tag};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
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
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain post from its row and its associated tags.
    pub fn into_domain(self, tags: Vec<Tag>) -> Post {
        Post {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            tags,
            published_at: self.published_at.map(Into::into),
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            deleted_at: self.deleted_at.map(Into::into),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel. Tags are written separately.
impl From<&Post> for ActiveModel {
    fn from(post: &Post) -> Self {
        Self {
            id: if post.id == 0 { NotSet } else { Set(post.id) },
            user_id: Set(post.user_id),
            title: Set(post.title.clone()),
            slug: Set(post.slug.clone()),
            content: Set(post.content.clone()),
            published_at: Set(post.published_at.map(Into::into)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
            deleted_at: Set(post.deleted_at.map(Into::into)),
        }
    }
}
