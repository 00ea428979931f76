use crate::domain::{Category, CategoryId, CategoryInput, UserId};
use crate::error::DomainError;
use crate::policy;
use crate::validation::WriteMode;

use super::{Repositories, check_posts_exist, ensure_owner, found, missing};

/// Categories: readable by anyone, writable by their owner.
#[derive(Clone)]
pub struct CategoryService {
    repos: Repositories,
}

impl CategoryService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.repos.categories.list().await?)
    }

    pub async fn retrieve(&self, id: CategoryId) -> Result<Category, DomainError> {
        found(self.repos.categories.find_by_id(id).await?, id)
    }

    pub async fn create(
        &self,
        actor: Option<UserId>,
        input: CategoryInput,
    ) -> Result<Category, DomainError> {
        let owner = policy::require_authenticated(actor)?;
        input.validate(WriteMode::Create)?;
        if let Some(posts) = input.normalized_posts() {
            check_posts_exist(self.repos.posts.as_ref(), "posts", &posts).await?;
        }

        let new = input
            .into_new(owner)
            .ok_or_else(|| DomainError::Internal("validated category lost a field".to_string()))?;
        let category = self.repos.categories.insert(new).await?;
        tracing::info!(category_id = category.id, owner, "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: CategoryId,
        input: CategoryInput,
        mode: WriteMode,
    ) -> Result<Category, DomainError> {
        let actor = policy::require_authenticated(actor)?;
        let mut category = found(self.repos.categories.find_by_id(id).await?, id)?;
        ensure_owner(actor, &category)?;
        input.validate(mode)?;
        if let Some(posts) = input.normalized_posts() {
            check_posts_exist(self.repos.posts.as_ref(), "posts", &posts).await?;
        }

        input.apply(&mut category);
        let category = self
            .repos
            .categories
            .update(category)
            .await
            .map_err(missing::<Category>(id))?;
        tracing::info!(category_id = id, "Category updated");
        Ok(category)
    }

    pub async fn delete(&self, actor: Option<UserId>, id: CategoryId) -> Result<(), DomainError> {
        let actor = policy::require_authenticated(actor)?;
        let category = found(self.repos.categories.find_by_id(id).await?, id)?;
        ensure_owner(actor, &category)?;

        self.repos
            .categories
            .delete(id)
            .await
            .map_err(missing::<Category>(id))?;
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}
