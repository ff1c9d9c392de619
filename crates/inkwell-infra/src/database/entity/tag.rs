//! Tag entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for inkwell_core::domain::Tag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            created_at: model.created_at.into(),
        }
    }
}

/// Unsaved tags (`id == 0`) leave the key to the database sequence.
impl From<inkwell_core::domain::Tag> for ActiveModel {
    fn from(tag: inkwell_core::domain::Tag) -> Self {
        Self {
            id: if tag.id == 0 { NotSet } else { Set(tag.id) },
            name: Set(tag.name),
            slug: Set(tag.slug),
            created_at: Set(tag.created_at.into()),
        }
    }
}
