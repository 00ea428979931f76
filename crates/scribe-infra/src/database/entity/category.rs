//! Category entity for SeaORM. Membership lives in `category_posts`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::category_post::Entity")]
    CategoryPost,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryPost.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_post::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_post::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
