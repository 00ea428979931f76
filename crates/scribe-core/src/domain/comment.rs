use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, Owned, Owner, PostId, UserId};
use crate::validation::{ValidationErrors, WriteMode};

/// Comment entity - a non-empty remark on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub post: PostId,
    pub owner: Owner,
    pub created: DateTime<Utc>,
}

impl Owned for Comment {
    const RESOURCE: &'static str = "Comment";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner.id
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub post: PostId,
    pub owner: UserId,
    pub created: DateTime<Utc>,
}

/// Client-supplied comment fields; `body` and `post` are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    #[serde(default, deserialize_with = "crate::validation::non_null")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "crate::validation::non_null")]
    pub post: Option<PostId>,
}

impl CommentInput {
    /// Shape checks only; whether `post` exists is up to the caller.
    pub fn validate(&self, mode: WriteMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("body", &self.body, mode);
        errors.require("post", &self.post, mode);
        if let Some(body) = &self.body {
            errors.check_text("body", body, false, None);
        }
        errors.into_result()
    }

    /// Build the insert payload. Call only after `validate(WriteMode::Create)`.
    pub fn into_new(self, owner: UserId) -> Option<NewComment> {
        Some(NewComment {
            body: self.body?,
            post: self.post?,
            owner,
            created: super::created_now(),
        })
    }

    pub fn apply(self, comment: &mut Comment) {
        if let Some(body) = self.body {
            comment.body = body;
        }
        if let Some(post) = self.post {
            comment.post = post;
        }
    }
}
