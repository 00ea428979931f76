//! `/posts/` handlers.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{PostId, PostInput};
use scribe_core::validation::WriteMode;

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /posts/
pub async fn list(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(views::many(posts, views::post)))
}

/// POST /posts/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(Some(identity.user_id), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(views::post(post)))
}

/// GET /posts/{id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.posts.retrieve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// PUT /posts/{id}/
pub async fn replace(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    update(state, identity, path, body, WriteMode::Replace).await
}

/// PATCH /posts/{id}/
pub async fn patch(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    update(state, identity, path, body, WriteMode::Patch).await
}

async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Json<PostInput>,
    mode: WriteMode,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(Some(identity.user_id), path.into_inner(), body.into_inner(), mode)
        .await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// DELETE /posts/{id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(Some(identity.user_id), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
