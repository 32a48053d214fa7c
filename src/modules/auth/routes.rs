use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use shelf_auth::{AuthService, AuthenticatedUser, CurrentUser, LoginForm};
use shelf_http::{AppError, JsonBody};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: AuthenticatedUser,
}

pub(super) async fn register(
    State(auth): State<Arc<AuthService>>,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<Json<UserEnvelope>, AppError> {
    let user = auth.register(&form).await?;
    Ok(Json(UserEnvelope { user }))
}

pub(super) async fn login(
    State(auth): State<Arc<AuthService>>,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<Json<UserEnvelope>, AppError> {
    let user = auth.login(&form).await?;
    Ok(Json(UserEnvelope { user }))
}

pub(super) async fn me(
    State(auth): State<Arc<AuthService>>,
    user: CurrentUser,
) -> Result<Json<UserEnvelope>, AppError> {
    let user = auth.issue(&user)?;
    Ok(Json(UserEnvelope { user }))
}
