use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Owned, Owner, PostId, UserId};
use crate::validation::{MAX_NAME_CHARS, ValidationErrors, WriteMode};

/// Post entity - a titled piece of text owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub owner: Owner,
    pub created: DateTime<Utc>,
}

impl Owned for Post {
    const RESOURCE: &'static str = "Post";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner.id
    }
}

/// Post about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub owner: UserId,
    pub created: DateTime<Utc>,
}

/// Client-supplied post fields. Both are optional and default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    #[serde(default, deserialize_with = "crate::validation::non_null")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::validation::non_null")]
    pub body: Option<String>,
}

impl PostInput {
    pub fn validate(&self, _mode: WriteMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.check_text("title", title, true, Some(MAX_NAME_CHARS));
        }
        errors.into_result()
    }

    pub fn into_new(self, owner: UserId) -> NewPost {
        NewPost {
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            owner,
            created: super::created_now(),
        }
    }

    /// Overlay the supplied fields onto an existing post.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_valid_and_defaults_to_empty() {
        let input = PostInput::default();
        assert!(input.validate(WriteMode::Create).is_ok());

        let new = input.into_new(7);
        assert_eq!(new.title, "");
        assert_eq!(new.body, "");
        assert_eq!(new.owner, 7);
        assert_eq!(new.created.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_null_is_rejected_but_absent_is_not() {
        assert!(serde_json::from_str::<PostInput>(r#"{"title":null}"#).is_err());
        assert!(serde_json::from_str::<PostInput>(r#"{"title":"t","body":null}"#).is_err());

        let input: PostInput = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.body.is_none());
    }

    #[test]
    fn test_owner_in_payload_is_ignored() {
        let input: PostInput =
            serde_json::from_str(r#"{"title":"Hello","body":"World","owner":"mallory"}"#).unwrap();
        let new = input.into_new(1);
        assert_eq!(new.owner, 1);
        assert_eq!(new.title, "Hello");
    }

    #[test]
    fn test_title_too_long() {
        let input = PostInput {
            title: Some("x".repeat(101)),
            body: None,
        };
        let errors = input.validate(WriteMode::Patch).unwrap_err();
        assert!(errors.get("title").is_some());
    }

    #[test]
    fn test_apply_keeps_omitted_fields() {
        let mut post = Post {
            id: 1,
            title: "Hello".to_string(),
            body: "World".to_string(),
            owner: Owner {
                id: 1,
                username: "alice".to_string(),
            },
            created: Utc::now(),
        };
        let created = post.created;

        PostInput {
            title: None,
            body: Some("Rust".to_string()),
        }
        .apply(&mut post);

        assert_eq!(post.title, "Hello");
        assert_eq!(post.body, "Rust");
        assert_eq!(post.created, created);
    }
}
