//! User entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

use scribe_core::domain::{NewUser, Owner};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::category::Entity")]
    Category,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for scribe_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            created: model.created.into(),
        }
    }
}

/// Insert payload; the id comes from the sequence.
impl From<NewUser> for ActiveModel {
    fn from(user: NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            created: Set(user.created.into()),
        }
    }
}
