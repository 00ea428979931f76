//! Response format negotiation.
//!
//! JSON is the only representation. A client may ask for it with a `.json`
//! path suffix or `?format=json`; any other `format` value names nothing and
//! yields 404. An `Accept` header that rules JSON out yields 406.

use actix_web::{
    Error,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{Uri, header},
    web,
};
use std::collections::HashMap;
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use crate::middleware::error::AppError;

const FORMAT: &str = "json";
const FORMAT_SUFFIX: &str = ".json";

pub struct FormatNegotiation;

impl<S, B> Transform<S, ServiceRequest> for FormatNegotiation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = FormatNegotiationService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FormatNegotiationService { service }))
    }
}

pub struct FormatNegotiationService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FormatNegotiationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if let Some(rejection) = reject(&req) {
            // Built inside the future so the body picks up the request ID
            return Box::pin(async move {
                tracing::debug!(path = %req.path(), "Rejected by format negotiation: {}", rejection);
                Ok(req.error_response(rejection).map_into_right_body())
            });
        }

        strip_format_suffix(&mut req);

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}

fn reject(req: &ServiceRequest) -> Option<AppError> {
    if let Some(format) = requested_format(req.query_string()) {
        if format != FORMAT {
            return Some(AppError::NotFound(format!(
                "Format '{}' is not available.",
                format
            )));
        }
    }

    let accept = req
        .headers()
        .get_all(header::ACCEPT)
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>();
    if !accept.is_empty() && !accept.iter().any(|v| accepts_json(v)) {
        return Some(AppError::NotAcceptable(
            "Could not satisfy the request Accept header.".to_string(),
        ));
    }

    None
}

/// Decoded, non-empty value of the `format` query parameter.
fn requested_format(query: &str) -> Option<String> {
    web::Query::<HashMap<String, String>>::from_query(query)
        .ok()?
        .into_inner()
        .remove("format")
        .filter(|format| !format.is_empty())
}

/// Whether an `Accept` header value admits `application/json`.
fn accepts_json(accept: &str) -> bool {
    accept.split(',').any(|range| {
        let mut params = range.split(';');
        let media = params.next().unwrap_or("").trim().to_ascii_lowercase();
        let refused = params.any(|p| {
            p.trim()
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q <= 0.0)
        });
        !refused && matches!(media.as_str(), "application/json" | "application/*" | "*/*")
    })
}

/// Rewrite `/posts/1.json` (or `/posts/1.json/`) to `/posts/1/` before routing.
fn strip_format_suffix(req: &mut ServiceRequest) {
    let path = req.path();
    let Some(stripped) = path
        .strip_suffix('/')
        .unwrap_or(path)
        .strip_suffix(FORMAT_SUFFIX)
    else {
        return;
    };

    let mut path = stripped.to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    let target = match req.query_string() {
        "" => path,
        query => format!("{}?{}", path, query),
    };

    match target.parse::<Uri>() {
        Ok(uri) => {
            req.match_info_mut().get_mut().update(&uri);
            req.head_mut().uri = uri;
        }
        Err(e) => tracing::debug!("Could not rewrite {}: {}", target, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_format() {
        assert_eq!(requested_format("format=json").as_deref(), Some("json"));
        assert_eq!(requested_format("page=2&format=xml").as_deref(), Some("xml"));
        assert_eq!(requested_format("format=%6Ason").as_deref(), Some("json"));
        assert_eq!(requested_format("format="), None);
        assert_eq!(requested_format("formats=json"), None);
        assert_eq!(requested_format(""), None);
    }

    #[test]
    fn test_accepts_json() {
        assert!(accepts_json("application/json"));
        assert!(accepts_json("text/html, */*;q=0.8"));
        assert!(accepts_json("application/*"));
        assert!(!accepts_json("text/html"));
        assert!(!accepts_json("application/json;q=0, text/plain"));
    }
}
