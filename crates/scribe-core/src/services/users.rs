use std::collections::HashMap;

use crate::domain::{NewUser, User, UserId, UserProfile, UserRegistration};
use crate::error::{DomainError, RepoError};
use crate::policy::{self, Access};
use crate::ports::PasswordService;
use crate::validation::ValidationErrors;

use super::Repositories;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Read-only user listing plus account lifecycle.
#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
}

impl UserService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Every user with the ids of what they own.
    pub async fn list(&self) -> Result<Vec<UserProfile>, DomainError> {
        let users = self.repos.users.list().await?;

        let mut posts: HashMap<UserId, Vec<i64>> = HashMap::new();
        for post in self.repos.posts.list().await? {
            posts.entry(post.owner.id).or_default().push(post.id);
        }
        let mut comments: HashMap<UserId, Vec<i64>> = HashMap::new();
        for comment in self.repos.comments.list().await? {
            comments.entry(comment.owner.id).or_default().push(comment.id);
        }
        let mut categories: HashMap<UserId, Vec<i64>> = HashMap::new();
        for category in self.repos.categories.list().await? {
            categories
                .entry(category.owner.id)
                .or_default()
                .push(category.id);
        }

        Ok(users
            .into_iter()
            .map(|user| UserProfile {
                posts: posts.remove(&user.id).unwrap_or_default(),
                comments: comments.remove(&user.id).unwrap_or_default(),
                categories: categories.remove(&user.id).unwrap_or_default(),
                id: user.id,
                username: user.username,
            })
            .collect())
    }

    pub async fn retrieve(&self, id: UserId) -> Result<UserProfile, DomainError> {
        let user = self
            .repos
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        Ok(UserProfile {
            posts: self
                .repos
                .posts
                .list_by_owner(id)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect(),
            comments: self
                .repos
                .comments
                .list_by_owner(id)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect(),
            categories: self
                .repos
                .categories
                .list_by_owner(id)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect(),
            id: user.id,
            username: user.username,
        })
    }

    /// Create an account after validating the registration payload.
    pub async fn register(
        &self,
        registration: UserRegistration,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        registration.validate()?;

        if self
            .repos
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(ValidationErrors::single("username", USERNAME_TAKEN).into());
        }

        let password_hash = passwords
            .hash(&registration.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let new = NewUser::new(registration.username, registration.email, password_hash);
        let user = self.repos.users.insert(new).await.map_err(|e| match e {
            RepoError::Constraint(_) => ValidationErrors::single("username", USERNAME_TAKEN).into(),
            other => DomainError::from(other),
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Look up a user by username and check their password.
    /// `None` means the credentials do not match any account.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        passwords: &dyn PasswordService,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.repos.users.find_by_username(username).await? else {
            return Ok(None);
        };

        let valid = passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(valid.then_some(user))
    }

    /// Delete an account and, transitively, everything it owns.
    /// Only the account itself may do this.
    pub async fn delete(&self, actor: Option<UserId>, id: UserId) -> Result<(), DomainError> {
        let actor = policy::require_authenticated(actor)?;
        if self.repos.users.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }
        policy::authorize(Some(actor), id, Access::Write)?;

        self.repos.users.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("User", id),
            other => other.into(),
        })?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
