//! `/comments/` handlers.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{CommentId, CommentInput};
use scribe_core::validation::WriteMode;

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /comments/
pub async fn list(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list().await?;
    Ok(HttpResponse::Ok().json(views::many(comments, views::comment)))
}

/// POST /comments/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(Some(identity.user_id), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(views::comment(comment)))
}

/// GET /comments/{id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    let comment = state.comments.retrieve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::comment(comment)))
}

/// PUT /comments/{id}/
pub async fn replace(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    update(state, identity, path, body, WriteMode::Replace).await
}

/// PATCH /comments/{id}/
pub async fn patch(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    update(state, identity, path, body, WriteMode::Patch).await
}

async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
    body: web::Json<CommentInput>,
    mode: WriteMode,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .update(Some(identity.user_id), path.into_inner(), body.into_inner(), mode)
        .await?;
    Ok(HttpResponse::Ok().json(views::comment(comment)))
}

/// DELETE /comments/{id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    state
        .comments
        .delete(Some(identity.user_id), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
