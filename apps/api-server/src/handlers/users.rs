//! Read-only user listing.

use actix_web::{HttpResponse, web};

use scribe_core::domain::UserId;

use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /users-list/
pub async fn list(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let users = state.users.list().await?;
    Ok(HttpResponse::Ok().json(views::many(users, views::user)))
}

/// GET /users-detail/{id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    _caller: OptionalIdentity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let user = state.users.retrieve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}
