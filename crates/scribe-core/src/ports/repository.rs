use async_trait::async_trait;

use crate::domain::{
    Category, CategoryId, Comment, CommentId, NewCategory, NewComment, NewPost, NewUser, Post,
    PostId, User, UserId,
};
use crate::error::RepoError;

/// Generic repository trait for owned resources.
///
/// `T` is the stored entity, `N` its insert payload, `ID` its key.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Every entity, oldest first.
    async fn list(&self) -> Result<Vec<T>, RepoError>;

    /// Entities owned by `owner`, in the same order as [`list`](Self::list).
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<T>, RepoError>;

    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it with its assigned ID.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Persist the mutable fields of an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity and everything that depends on it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository. Deleting a post removes its comments and category memberships.
pub trait PostRepository: BaseRepository<Post, NewPost, PostId> {}

/// Comment repository.
pub trait CommentRepository: BaseRepository<Comment, NewComment, CommentId> {}

/// Category repository. Lists are ordered by id.
pub trait CategoryRepository: BaseRepository<Category, NewCategory, CategoryId> {}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RepoError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fails with [`RepoError::Constraint`] when the username is taken.
    async fn insert(&self, new: NewUser) -> Result<User, RepoError>;

    /// Delete a user along with their posts, comments and categories.
    async fn delete(&self, id: UserId) -> Result<(), RepoError>;
}
