//! Role-based authorization guards.
//!
//! Roles:
//! - admin: manages projects, categories and schedules through the dashboard
//! - user: may comment on projects

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for dashboard handlers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn guard(user: Option<AuthenticatedUser>) -> Result<RequireAdmin, AppError> {
        let mut req = Request::builder().uri("/dashboard").body(()).unwrap();
        if let Some(user) = user {
            req.extensions_mut().insert(user);
        }
        let (mut parts, _) = req.into_parts();
        RequireAdmin::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_require_admin() {
        assert!(matches!(guard(None).await, Err(AppError::Unauthorized(_))));

        let user = AuthenticatedUser {
            user_id: 2,
            name: None,
            role: "user".to_string(),
        };
        assert!(matches!(
            guard(Some(user.clone())).await,
            Err(AppError::Forbidden(_))
        ));

        let admin = AuthenticatedUser {
            role: "admin".to_string(),
            ..user
        };
        assert!(guard(Some(admin)).await.is_ok());
    }
}
