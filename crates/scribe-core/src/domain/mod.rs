//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
mod user;

pub use category::{Category, CategoryInput, NewCategory};
pub use comment::{Comment, CommentInput, NewComment};
pub use post::{NewPost, Post, PostInput};
pub use user::{NewUser, User, UserProfile, UserRegistration};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type PostId = i64;
pub type CommentId = i64;
pub type CategoryId = i64;

/// Creation timestamp at the microsecond precision the database keeps.
pub(crate) fn created_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Owner reference carried by every owned resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for Owner {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// A resource that belongs to exactly one user.
pub trait Owned {
    /// Name used in "not found" errors.
    const RESOURCE: &'static str;

    fn id(&self) -> i64;

    fn owner_id(&self) -> UserId;
}
