//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use scribe_core::domain::{User, UserRegistration};
use scribe_core::ports::{PasswordService, TokenService};
use scribe_shared::dto::{AuthResponse, LoginRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_token(tokens: &dyn TokenService, user_id: i64, username: &str) -> AppResult<AuthResponse> {
    let token = tokens
        .generate_token(user_id, username)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(AuthResponse::bearer(
        token,
        tokens.expiration_seconds().max(0) as u64,
    ))
}

/// POST /api/v1/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<UserRegistration>,
) -> AppResult<HttpResponse> {
    let user: User = state
        .users
        .register(body.into_inner(), password_service.get_ref().as_ref())
        .await?;

    let response = issue_token(token_service.get_ref().as_ref(), user.id, &user.username)?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /api/v1/auth/token
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .authenticate(&req.username, &req.password, password_service.get_ref().as_ref())
        .await?
        .ok_or_else(|| {
            tracing::debug!(username = %req.username, "Login rejected");
            AppError::Unauthorized("Unable to log in with provided credentials.".to_string())
        })?;

    let response = issue_token(token_service.get_ref().as_ref(), user.id, &user.username)?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/v1/auth/token/refresh - trade a valid token for a fresh one
pub async fn refresh(
    identity: Identity,
    token_service: web::Data<Arc<dyn TokenService>>,
) -> AppResult<HttpResponse> {
    let response = issue_token(
        token_service.get_ref().as_ref(),
        identity.user_id,
        &identity.username,
    )?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/v1/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state.users.retrieve(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(views::user(profile)))
}

/// DELETE /api/v1/auth/me - remove the account and everything it owns
pub async fn delete_me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state
        .users
        .delete(Some(identity.user_id), identity.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
