use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, CommentId, PostId, UserId};
use crate::validation::{
    MAX_USERNAME_CHARS, MIN_PASSWORD_CHARS, REQUIRED, ValidationErrors,
};

/// User entity - represents a user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
            created: super::created_now(),
        }
    }
}

/// Read-only projection of a user with the ids of everything they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub posts: Vec<PostId>,
    pub comments: Vec<CommentId>,
    pub categories: Vec<CategoryId>,
}

/// Sign-up payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegistration {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

impl UserRegistration {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.username.is_empty() {
            errors.add("username", REQUIRED);
        } else if self.username.chars().count() > MAX_USERNAME_CHARS {
            errors.add(
                "username",
                format!("Ensure this field has no more than {MAX_USERNAME_CHARS} characters."),
            );
        } else if !self.username.chars().all(is_username_char) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if !self.email.is_empty() && !self.email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }

        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.add(
                "password",
                format!("This password is too short. It must contain at least {MIN_PASSWORD_CHARS} characters."),
            );
        }

        errors.into_result()
    }
}
