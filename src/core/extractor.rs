use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::visitors::models::normalize_ip;
use crate::features::visitors::VisitContext;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Captures who is visiting: optional user, client address and user agent.
///
/// The client address prefers the first `X-Forwarded-For` hop, then
/// `X-Real-IP`. Missing or malformed headers yield `None`; extraction never fails.
impl<S> FromRequestParts<S> for VisitContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_str = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let ip = header_str("x-forwarded-for")
            .and_then(|v| v.split(',').next().and_then(normalize_ip))
            .or_else(|| header_str("x-real-ip").and_then(|v| normalize_ip(&v)));

        let user_agent = header_str(header::USER_AGENT.as_str());

        let user_id = parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|u| u.user_id);

        Ok(VisitContext {
            user_id,
            ip,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn context_for(req: HttpRequest<()>) -> VisitContext {
        let (mut parts, _) = req.into_parts();
        VisitContext::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_visit_context_without_headers_is_anonymous() {
        let ctx = context_for(HttpRequest::builder().uri("/").body(()).unwrap()).await;
        assert_eq!(ctx, VisitContext::default());
    }

    #[tokio::test]
    async fn test_visit_context_reads_forwarded_for_and_user() {
        let mut req = HttpRequest::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header("x-real-ip", "10.0.0.1")
            .header("user-agent", "curl/8.0")
            .body(())
            .unwrap();
        req.extensions_mut().insert(AuthenticatedUser {
            user_id: 7,
            name: None,
            role: "user".to_string(),
        });

        let ctx = context_for(req).await;
        assert_eq!(ctx.user_id, Some(7));
        assert_eq!(ctx.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn test_visit_context_drops_malformed_addresses() {
        let req = HttpRequest::builder()
            .uri("/")
            .header("x-forwarded-for", "x".repeat(80))
            .header("x-real-ip", "not-an-ip")
            .body(())
            .unwrap();
        let ctx = context_for(req).await;
        assert_eq!(ctx.ip, None);

        let req = HttpRequest::builder()
            .uri("/")
            .header("x-forwarded-for", "unknown, 10.0.0.1")
            .header("x-real-ip", " 2001:db8::1 ")
            .body(())
            .unwrap();
        let ctx = context_for(req).await;
        assert_eq!(ctx.ip.as_deref(), Some("2001:db8::1"));
    }

    #[tokio::test]
    async fn test_visit_context_falls_back_to_real_ip() {
        let req = HttpRequest::builder()
            .uri("/")
            .header("x-real-ip", "198.51.100.4")
            .body(())
            .unwrap();
        let ctx = context_for(req).await;
        assert_eq!(ctx.ip.as_deref(), Some("198.51.100.4"));
        assert_eq!(ctx.user_agent, None);
    }
}
