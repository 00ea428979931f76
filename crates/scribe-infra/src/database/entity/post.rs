//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};

use scribe_core::domain::{NewPost, Owner, Post};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created: DateTimeWithTimeZone,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
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
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine the row with its already loaded owner.
    pub fn into_domain(self, owner: Owner) -> Post {
        Post {
            id: self.id,
            title: self.title,
            body: self.body,
            owner,
            created: self.created.into(),
        }
    }
}

impl From<NewPost> for ActiveModel {
    fn from(post: NewPost) -> Self {
        Self {
            id: NotSet,
            created: Set(post.created.into()),
            title: Set(post.title),
            body: Set(post.body),
            owner_id: Set(post.owner),
        }
    }
}

/// Update payload: only the editable columns are marked as changed.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Unchanged(post.id),
            created: NotSet,
            title: Set(post.title),
            body: Set(post.body),
            owner_id: NotSet,
        }
    }
}
