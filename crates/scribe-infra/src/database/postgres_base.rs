use std::collections::{BTreeSet, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::{ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, QueryFilter};

use scribe_core::domain::{Comment, Owner, Post, UserId};
use scribe_core::error::RepoError;

use super::entity::{comment, post, user};

/// Generic PostgreSQL repository: a shared connection tagged with the entity it serves.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self {
            db: db.into(),
            _entity: PhantomData,
        }
    }
}

/// Map a read failure.
pub(crate) fn query_err(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        _ => RepoError::Query(e.to_string()),
    }
}

/// Map a write failure, surfacing unique/foreign key violations as constraints.
pub(crate) fn write_err(e: DbErr) -> RepoError {
    match e {
        DbErr::RecordNotUpdated => RepoError::NotFound,
        e => {
            let err_str = e.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Entity already exists".to_string())
            } else if err_str.contains("foreign key") {
                RepoError::Constraint("Referenced entity does not exist".to_string())
            } else {
                query_err(e)
            }
        }
    }
}

/// Load the owner references for a set of user ids.
pub(crate) async fn load_owners<C, I>(db: &C, ids: I) -> Result<HashMap<UserId, Owner>, RepoError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = UserId>,
{
    let ids: BTreeSet<UserId> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(query_err)?;

    Ok(users.into_iter().map(|u| (u.id, u.owner())).collect())
}

/// Owner reference for a single user id.
pub(crate) async fn load_owner<C: ConnectionTrait>(db: &C, id: UserId) -> Result<Owner, RepoError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(query_err)?
        .map(|u| u.owner())
        .ok_or_else(|| RepoError::Constraint(format!("owner {id} does not exist")))
}

/// A row that carries an `owner_id` and becomes a domain object once the
/// owner reference is known.
pub(crate) trait OwnedRow {
    type Domain;

    fn owner_id(&self) -> UserId;

    fn with_owner(self, owner: Owner) -> Self::Domain;
}

impl OwnedRow for post::Model {
    type Domain = Post;

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn with_owner(self, owner: Owner) -> Post {
        self.into_domain(owner)
    }
}

impl OwnedRow for comment::Model {
    type Domain = Comment;

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn with_owner(self, owner: Owner) -> Comment {
        self.into_domain(owner)
    }
}

/// Resolve owners for `rows` with a single query, keeping row order.
pub(crate) async fn attach_owners<C, R>(db: &C, rows: Vec<R>) -> Result<Vec<R::Domain>, RepoError>
where
    C: ConnectionTrait,
    R: OwnedRow,
{
    let owners = load_owners(db, rows.iter().map(OwnedRow::owner_id)).await?;

    rows.into_iter()
        .map(|row| {
            let owner = owners
                .get(&row.owner_id())
                .cloned()
                .ok_or_else(|| RepoError::Query(format!("dangling owner {}", row.owner_id())))?;
            Ok(row.with_owner(owner))
        })
        .collect()
}
