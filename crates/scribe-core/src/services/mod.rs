//! Resource services - list/create/retrieve/update/delete with ownership checks.
//!
//! Every mutating call takes the acting identity explicitly. For updates
//! and deletes the checks run in a fixed order: authentication, lookup,
//! ownership, then payload validation.

mod categories;
mod comments;
mod posts;
mod users;

use std::sync::Arc;

pub use categories::CategoryService;
pub use comments::CommentService;
pub use posts::PostService;
pub use users::UserService;

use crate::domain::{Owned, PostId, UserId};
use crate::error::{DomainError, RepoError};
use crate::policy::{self, Access};
use crate::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};
use crate::validation::{ValidationErrors, missing_reference};

/// Handles to every store the services talk to.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
}

/// Turn a lookup miss into a "not found" error.
fn found<T: Owned>(entity: Option<T>, id: i64) -> Result<T, DomainError> {
    entity.ok_or_else(|| DomainError::not_found(T::RESOURCE, id))
}

/// Ownership check for an entity that is about to be changed.
fn ensure_owner<T: Owned>(actor: UserId, entity: &T) -> Result<(), DomainError> {
    let allowed = policy::authorize(Some(actor), entity.owner_id(), Access::Write);
    if allowed.is_err() {
        tracing::debug!(
            resource = T::RESOURCE,
            id = entity.id(),
            actor,
            owner = entity.owner_id(),
            "Write denied to non-owner"
        );
    }
    allowed
}

/// Map a store-level miss on delete/update to the resource's "not found".
fn missing<T: Owned>(id: i64) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(T::RESOURCE, id),
        other => other.into(),
    }
}

/// Record a field error for every id in `posts` that does not exist.
async fn check_posts_exist(
    posts: &dyn PostRepository,
    field: &str,
    ids: &[PostId],
) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new();
    for &id in ids {
        if posts.find_by_id(id).await?.is_none() {
            errors.add(field, missing_reference(id));
        }
    }
    errors.into_result().map_err(DomainError::from)
}
