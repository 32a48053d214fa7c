//! Bearer-token authentication for axum routers.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use shelf_http::AppError;

pub use crate::service::CurrentUser;
use crate::service::AuthService;

/// Resolve the caller from `Authorization: Bearer <token>`.
///
/// Requests without the header pass through unauthenticated; handlers that
/// need an identity reject them through the [`CurrentUser`] extractor. A header
/// that is present but malformed or carries a bad token is rejected here.
pub async fn authenticate(
    State(auth): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(req.headers())? {
        let user = auth.resolve_user(token).await?;
        tracing::debug!(user_id = %user.id, "request authenticated");
        req.extensions_mut().insert(user);
    }

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty() && !token.contains(' '))
        .map(Some)
        .ok_or_else(|| {
            AppError::unauthorized(
                "credentials_bad_format",
                "Format is Authorization: Bearer [token]",
            )
        })
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            AppError::unauthorized("credentials_required", "No authorization token was found")
        })
    }
}
