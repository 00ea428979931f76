use crate::domain::{Owned, Post, PostId, PostInput, UserId};
use crate::error::DomainError;
use crate::policy;
use crate::validation::WriteMode;

use super::{Repositories, ensure_owner, found, missing};

/// Posts: readable by anyone, writable by their owner.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
}

impl PostService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// All posts, oldest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repos.posts.list().await?)
    }

    pub async fn retrieve(&self, id: PostId) -> Result<Post, DomainError> {
        found(self.repos.posts.find_by_id(id).await?, id)
    }

    /// Create a post owned by `actor`. Any owner in the payload is ignored.
    pub async fn create(&self, actor: Option<UserId>, input: PostInput) -> Result<Post, DomainError> {
        let owner = policy::require_authenticated(actor)?;
        input.validate(WriteMode::Create)?;

        let post = self.repos.posts.insert(input.into_new(owner)).await?;
        tracing::info!(post_id = post.id, owner, "Post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: PostId,
        input: PostInput,
        mode: WriteMode,
    ) -> Result<Post, DomainError> {
        let actor = policy::require_authenticated(actor)?;
        let mut post = found(self.repos.posts.find_by_id(id).await?, id)?;
        ensure_owner(actor, &post)?;
        input.validate(mode)?;

        input.apply(&mut post);
        let post = self
            .repos
            .posts
            .update(post)
            .await
            .map_err(missing::<Post>(id))?;
        tracing::info!(post_id = post.id(), "Post updated");
        Ok(post)
    }

    /// Delete a post together with its comments and category memberships.
    pub async fn delete(&self, actor: Option<UserId>, id: PostId) -> Result<(), DomainError> {
        let actor = policy::require_authenticated(actor)?;
        let post = found(self.repos.posts.find_by_id(id).await?, id)?;
        ensure_owner(actor, &post)?;

        self.repos
            .posts
            .delete(id)
            .await
            .map_err(missing::<Post>(id))?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }
}
