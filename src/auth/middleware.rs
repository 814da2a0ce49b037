//! Authentication middleware and role guards

use crate::auth::jwt::validate_token;
use crate::core::error::{BoomError, Result};
use crate::db::models::Role;
use crate::db::repository::Repository;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;

/// Authenticated user info carried in request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Authentication middleware
///
/// Resolves the bearer credential to a user identity and stores it in the
/// request extensions. The blocked flag is not checked here: blocking has
/// no login effect yet, it only hides users in admin tooling.
pub async fn authenticate(
    State(state): State<crate::api::handlers::AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    use axum::http::header;

    // Authorization header first, "token" query parameter as a fallback
    let token_from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").map(|t| t.to_string()));

    let token = token_from_header.or_else(|| {
        request.uri().query().and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(k, _)| k == "token")
                .map(|(_, v)| v.to_string())
        })
    });

    let token = match token {
        Some(t) => t,
        None => {
            let error =
                BoomError::AuthenticationError("Missing authentication token".to_string());
            return error.into_response();
        }
    };

    let claims = match validate_token(&token, &state.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    let user = match state.user_repo.find_by_id(&claims.user_id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            let error = BoomError::AuthenticationError("User not found".to_string());
            return error.into_response();
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    });

    next.run(request).await
}

/// Role guard middleware, evaluated once per route group
///
/// Layered inside `authenticate`, so the `AuthUser` extension is already
/// present when it runs. Returns 403 when the caller's role is not in the
/// allowed set.
pub fn require_roles(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let role = match request.extensions().get::<AuthUser>() {
                Some(user) => user.role,
                None => {
                    return BoomError::AuthenticationError(
                        "User not authenticated".to_string(),
                    )
                    .into_response();
                }
            };

            if !allowed.contains(&role) {
                return BoomError::PermissionDenied(format!(
                    "Access denied for role '{}'",
                    role
                ))
                .into_response();
            }

            next.run(request).await
        })
    }
}

// Implement FromRequestParts for AuthUser to enable extraction in handlers
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BoomError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| BoomError::AuthenticationError("User not authenticated".to_string()))
    }
}
