//! Authentication extractors.
//!
//! A request without an `Authorization` header is anonymous. A request with
//! one must carry a valid bearer token for an existing account, otherwise it
//! is rejected with 401 whatever the route.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use std::sync::Arc;

use scribe_core::domain::UserId;
use scribe_core::ports::{AuthError, TokenClaims, TokenService};
use scribe_shared::ErrorResponse;

use crate::middleware::error::{AppError, problem};
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => {
                ErrorResponse::unauthorized("Authentication credentials were not provided.")
            }
            AuthError::InvalidCredentials => {
                ErrorResponse::unauthorized("Unable to log in with provided credentials.")
            }
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        problem(self.status_code(), error)
    }
}

fn invalid(msg: &str) -> AuthenticationError {
    AuthenticationError(AuthError::InvalidToken(msg.to_string()))
}

/// Decode the bearer token, if the request carries one.
fn bearer_claims(req: &HttpRequest) -> Result<Option<TokenClaims>, AuthenticationError> {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token_service = req
        .app_data::<web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            invalid("Server configuration error")
        })?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| invalid("Invalid authorization header"))?;

    // Parse "Bearer <token>"
    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| invalid("Expected Bearer token"))?;

    token_service
        .validate_token(token)
        .map(Some)
        .map_err(AuthenticationError)
}

/// Optional identity extractor - anonymous when no credentials are sent.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = bearer_claims(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let Some(claims) = claims? else {
                return Ok(OptionalIdentity(None));
            };
            let state = state.ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                invalid("Server configuration error")
            })?;

            // Tokens outlive deleted accounts
            let user = state
                .repos
                .users
                .find_by_id(claims.user_id)
                .await
                .map_err(AppError::from)?;
            if user.is_none() {
                return Err(invalid("User not found").into());
            }

            Ok::<_, actix_web::Error>(OptionalIdentity(Some(Identity::from(claims))))
        })
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = OptionalIdentity::from_request(req, payload);
        Box::pin(async move {
            let OptionalIdentity(identity) = fut.await?;
            identity
                .ok_or_else(|| AuthenticationError(AuthError::MissingAuth))
                .map_err(actix_web::Error::from)
        })
    }
}
