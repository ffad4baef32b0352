use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::{ROLE_ADMIN, ROLE_USER};

use axum::{extract::Request, middleware::Next, response::Response, Router};

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 1,
        name: Some("Test Admin".to_string()),
        role: ROLE_ADMIN.to_string(),
    }
}

pub fn create_regular_user(user_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        name: Some(format!("User {}", user_id)),
        role: ROLE_USER.to_string(),
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

/// Wrap a router so every request arrives as the test admin
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Wrap a router so every request arrives as a regular (non-admin) user
pub fn with_user_auth(router: Router, user_id: i64) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| async move {
            request
                .extensions_mut()
                .insert(create_regular_user(user_id));
            next.run(request).await
        },
    ))
}
