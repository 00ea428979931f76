use serde::{Deserialize, Serialize};

use super::{CategoryId, Owned, Owner, PostId, UserId};
use crate::validation::{MAX_NAME_CHARS, ValidationErrors, WriteMode};

/// Category entity - a named, owned set of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub owner: Owner,
    /// Member post ids, ascending.
    pub posts: Vec<PostId>,
}

impl Owned for Category {
    const RESOURCE: &'static str = "Category";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner.id
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub owner: UserId,
    pub posts: Vec<PostId>,
}

/// Client-supplied category fields; `name` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default, deserialize_with = "crate::validation::non_null")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::validation::non_null")]
    pub posts: Option<Vec<PostId>>,
}

impl CategoryInput {
    pub fn validate(&self, mode: WriteMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, mode);
        if let Some(name) = &self.name {
            errors.check_text("name", name, false, Some(MAX_NAME_CHARS));
        }
        errors.into_result()
    }

    /// Member ids sorted with duplicates removed.
    pub fn normalized_posts(&self) -> Option<Vec<PostId>> {
        self.posts.as_ref().map(|posts| {
            let mut posts = posts.clone();
            posts.sort_unstable();
            posts.dedup();
            posts
        })
    }

    pub fn into_new(self, owner: UserId) -> Option<NewCategory> {
        let posts = self.normalized_posts().unwrap_or_default();
        Some(NewCategory {
            name: self.name?,
            owner,
            posts,
        })
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(posts) = self.normalized_posts() {
            category.posts = posts;
        }
        if let Some(name) = self.name {
            category.name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required_on_replace_but_not_patch() {
        assert!(CategoryInput::default().validate(WriteMode::Replace).is_err());
        assert!(CategoryInput::default().validate(WriteMode::Patch).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = CategoryInput {
            name: Some("   ".to_string()),
            posts: None,
        };
        assert!(input.validate(WriteMode::Create).is_err());
    }

    #[test]
    fn test_posts_are_deduplicated() {
        let input = CategoryInput {
            name: Some("rust".to_string()),
            posts: Some(vec![3, 1, 3, 2]),
        };
        let new = input.into_new(1).unwrap();
        assert_eq!(new.posts, vec![1, 2, 3]);
    }

    #[test]
    fn test_null_posts_is_rejected() {
        assert!(serde_json::from_str::<CategoryInput>(r#"{"name":"rust","posts":null}"#).is_err());

        let input: CategoryInput = serde_json::from_str(r#"{"name":"rust"}"#).unwrap();
        assert!(input.posts.is_none());
    }
}
