use crate::domain::{Comment, CommentId, CommentInput, UserId};
use crate::error::DomainError;
use crate::policy;
use crate::validation::WriteMode;

use super::{Repositories, check_posts_exist, ensure_owner, found, missing};

/// Comments: readable by anyone, writable by their owner.
#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
}

impl CommentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// All comments, oldest first.
    pub async fn list(&self) -> Result<Vec<Comment>, DomainError> {
        Ok(self.repos.comments.list().await?)
    }

    pub async fn retrieve(&self, id: CommentId) -> Result<Comment, DomainError> {
        found(self.repos.comments.find_by_id(id).await?, id)
    }

    pub async fn create(
        &self,
        actor: Option<UserId>,
        input: CommentInput,
    ) -> Result<Comment, DomainError> {
        let owner = policy::require_authenticated(actor)?;
        input.validate(WriteMode::Create)?;
        if let Some(post) = input.post {
            check_posts_exist(self.repos.posts.as_ref(), "post", &[post]).await?;
        }

        let new = input
            .into_new(owner)
            .ok_or_else(|| DomainError::Internal("validated comment lost a field".to_string()))?;
        let comment = self.repos.comments.insert(new).await?;
        tracing::info!(comment_id = comment.id, post_id = comment.post, owner, "Comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: CommentId,
        input: CommentInput,
        mode: WriteMode,
    ) -> Result<Comment, DomainError> {
        let actor = policy::require_authenticated(actor)?;
        let mut comment = found(self.repos.comments.find_by_id(id).await?, id)?;
        ensure_owner(actor, &comment)?;
        input.validate(mode)?;
        if let Some(post) = input.post {
            check_posts_exist(self.repos.posts.as_ref(), "post", &[post]).await?;
        }

        input.apply(&mut comment);
        let comment = self
            .repos
            .comments
            .update(comment)
            .await
            .map_err(missing::<Comment>(id))?;
        tracing::info!(comment_id = id, "Comment updated");
        Ok(comment)
    }

    pub async fn delete(&self, actor: Option<UserId>, id: CommentId) -> Result<(), DomainError> {
        let actor = policy::require_authenticated(actor)?;
        let comment = found(self.repos.comments.find_by_id(id).await?, id)?;
        ensure_owner(actor, &comment)?;

        self.repos
            .comments
            .delete(id)
            .await
            .map_err(missing::<Comment>(id))?;
        tracing::info!(comment_id = id, "Comment deleted");
        Ok(())
    }
}
