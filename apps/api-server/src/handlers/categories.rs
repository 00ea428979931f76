//! `/categories/` handlers.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{CategoryId, CategoryInput};
use scribe_core::validation::WriteMode;

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /categories/
pub async fn list(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(views::many(categories, views::category)))
}

/// POST /categories/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .create(Some(identity.user_id), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(views::category(category)))
}

/// GET /categories/{id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
    path: web::Path<CategoryId>,
) -> AppResult<HttpResponse> {
    let category = state.categories.retrieve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::category(category)))
}

/// PUT /categories/{id}/
pub async fn replace(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CategoryId>,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    update(state, identity, path, body, WriteMode::Replace).await
}

/// PATCH /categories/{id}/
pub async fn patch(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CategoryId>,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    update(state, identity, path, body, WriteMode::Patch).await
}

async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CategoryId>,
    body: web::Json<CategoryInput>,
    mode: WriteMode,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .update(Some(identity.user_id), path.into_inner(), body.into_inner(), mode)
        .await?;
    Ok(HttpResponse::Ok().json(views::category(category)))
}

/// DELETE /categories/{id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CategoryId>,
) -> AppResult<HttpResponse> {
    state
        .categories
        .delete(Some(identity.user_id), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
