mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use serde_json::json;

use shelf_auth::{authenticate, AuthService};
use shelf_kernel::{InitCtx, Module};

pub use routes::UserEnvelope;

/// Registration, login, and identity lookup
pub struct AuthModule {
    auth: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            enforce_password_policy = ctx.settings.auth.enforce_password_policy,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/register", post(routes::register))
            .route("/login", post(routes::login))
            .route(
                "/me",
                get(routes::me).route_layer(from_fn_with_state(self.auth.clone(), authenticate)),
            )
            .with_state(self.auth.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let credentials = json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Credentials" } } }
        });
        let user = json!({
            "description": "Authenticated user",
            "content": { "application/json": { "schema": {
                "type": "object",
                "properties": { "user": { "$ref": "#/components/schemas/AuthenticatedUser" } }
            }}}
        });
        let message = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/MessageError" } } });
        let unauthorized = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/AuthError" } } });

        Some(json!({
            "paths": {
                "/register": {
                    "post": {
                        "summary": "Register a new user",
                        "tags": ["Auth"],
                        "requestBody": credentials,
                        "responses": {
                            "200": user,
                            "400": { "description": "Blank field or username taken", "content": message }
                        }
                    }
                },
                "/login": {
                    "post": {
                        "summary": "Log in",
                        "tags": ["Auth"],
                        "requestBody": credentials,
                        "responses": {
                            "200": user,
                            "400": { "description": "Blank field", "content": message },
                            "401": { "description": "Bad credentials", "content": unauthorized }
                        }
                    }
                },
                "/me": {
                    "get": {
                        "summary": "Current user with a fresh token",
                        "tags": ["Auth"],
                        "security": [{ "bearerAuth": [] }],
                        "responses": {
                            "200": user,
                            "401": { "description": "Missing or invalid token", "content": unauthorized }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Credentials": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string" }
                        },
                        "required": ["username", "password"]
                    },
                    "AuthenticatedUser": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "username": { "type": "string" },
                            "token": { "type": "string" }
                        },
                        "required": ["id", "username", "token"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the auth module
pub fn create_module(auth: Arc<AuthService>) -> Arc<dyn Module> {
    Arc::new(AuthModule::new(auth))
}
