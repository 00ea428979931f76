//! Error handling middleware - RFC 7807 compliant responses.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use scribe_core::error::{DomainError, RepoError};
use scribe_shared::ErrorResponse;

use crate::observability::current_request_id;

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
const NOT_OWNER: &str = "You do not have permission to perform this action.";

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden,
    NotAcceptable(String),
    Conflict(String),
    Internal(String),
    Validation(BTreeMap<String, Vec<String>>),
}

impl AppError {
    pub fn unauthenticated() -> Self {
        AppError::Unauthorized(NOT_AUTHENTICATED.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::NotAcceptable(msg) => write!(f, "Not acceptable: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(NOT_OWNER),
            AppError::NotAcceptable(detail) => {
                ErrorResponse::new(406, "Not Acceptable").with_detail(detail)
            }
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors.clone()),
        };

        problem(self.status_code(), error)
    }
}

/// Serialize a problem body, tagging it with the current request ID.
pub fn problem(status: StatusCode, error: ErrorResponse) -> HttpResponse {
    let error = match current_request_id() {
        Some(id) => error.with_request_id(id),
        None => error,
    };
    HttpResponse::build(status)
        .content_type("application/problem+json")
        .json(error)
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(errors) => AppError::Validation(errors.into_fields()),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthenticated => AppError::unauthenticated(),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Malformed or non-JSON request bodies.
pub fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Path segments that do not parse as ids name no resource.
pub fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Unparseable path segment: {}", err);
    AppError::NotFound("No resource matches the given path.".to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use scribe_core::validation::ValidationErrors;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Post", 3), StatusCode::NOT_FOUND),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::Duplicate("x".into()), StatusCode::CONFLICT),
            (DomainError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[actix_rt::test]
    async fn test_validation_error_body_lists_fields() {
        let err = AppError::from(DomainError::from(ValidationErrors::single(
            "title",
            "This field is required.",
        )));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = body_of(err).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["errors"]["title"][0], "This field is required.");
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_not_leaked() {
        let body = body_of(AppError::Internal("connection refused".into())).await;
        assert_eq!(body["status"], 500);
        assert!(body.get("detail").is_none());
    }
}
